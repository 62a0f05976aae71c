//! `trustctl apply` - Roll a certificate out to the VIP, one node, or all nodes.

use anyhow::Result;
use colored::Colorize;
use tracing::info;
use trustctl::{Node, NodeDirectory, Orchestrator, RolloutPlan, TargetSelector, TrustClient};

use super::{finish, Context};
use crate::cli::args::{ApplyArgs, ApplyCommands, ApplyOptions};
use crate::output;
use crate::prompt;

pub async fn execute(ctx: Context, args: ApplyArgs) -> Result<()> {
    let client = ctx.client()?;

    let (options, selector, concurrency) = match args.command {
        ApplyCommands::Cluster(options) => (options, Some(TargetSelector::Cluster), None),
        ApplyCommands::Node { node, options } => {
            let node = match node {
                Some(query) => Some(find_node(&client, &query).await?),
                None => choose_node(&ctx, &client).await?,
            };
            (options, node.map(TargetSelector::SingleNode), None)
        }
        ApplyCommands::AllNodes {
            concurrency,
            options,
        } => (options, Some(TargetSelector::AllNodes), concurrency),
    };

    rollout(&ctx, &client, options, selector, concurrency).await
}

/// Pick a certificate if needed, confirm, execute and print the summary
pub(crate) async fn rollout(
    ctx: &Context,
    client: &TrustClient,
    options: ApplyOptions,
    selector: Option<TargetSelector>,
    concurrency: Option<usize>,
) -> Result<()> {
    // Backing out of the node pick skips the certificate pick
    let certificate_id = match (&selector, options.certificate_id) {
        (None, _) => None,
        (Some(_), Some(id)) => Some(id),
        (Some(_), None) => super::certs::choose_certificate(ctx, client).await?,
    };

    let plan = match RolloutPlan::new(certificate_id, selector) {
        Ok(plan) => plan,
        Err(e) if e.is_aborted() => {
            info!("rollout cancelled before confirmation");
            println!("{}", "Aborted.".yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let confirmation = prompt::confirm(&plan.confirmation_prompt(), options.yes)?;
    let orchestrator = Orchestrator::new(client)
        .concurrency(concurrency.unwrap_or(ctx.config.rollout_concurrency));

    let spinner = ctx.spinner("Waiting for manager API...");
    let result = orchestrator.execute(&plan, confirmation).await;
    finish(spinner);

    let summary = match result {
        Ok(summary) => summary,
        Err(e) if e.is_aborted() => {
            println!("{}", "Aborted.".yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    output::print_summary(ctx.output_format, &summary)?;
    if !summary.all_succeeded() {
        anyhow::bail!(
            "{} of {} targets failed",
            summary.failures(),
            summary.len()
        );
    }
    Ok(())
}

/// Look up `--node` by FQDN or IP
async fn find_node(client: &TrustClient, query: &str) -> Result<Node> {
    match NodeDirectory::new(client).find(query).await {
        Ok(node) => Ok(node),
        Err(e) if e.is_invalid_selection() => Err(anyhow::anyhow!(
            "no node matches '{query}' by FQDN or IP; run without --node to pick from the list"
        )),
        Err(e) => Err(e.into()),
    }
}

/// Print the node list and ask for a pick
pub(crate) async fn choose_node(ctx: &Context, client: &TrustClient) -> Result<Option<Node>> {
    let spinner = ctx.spinner("Waiting for manager API...");
    let nodes = NodeDirectory::new(client).list().await;
    finish(spinner);
    let nodes = nodes?;

    if nodes.is_empty() {
        println!("{}", "No nodes found.".red());
        return Ok(None);
    }
    output::print_nodes(&nodes);
    prompt::pick_node(&nodes)
}
