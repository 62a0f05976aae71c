//! `trustctl menu` - Interactive menu, the default with no subcommand.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Select};
use tracing::{error, info};
use trustctl::TargetSelector;

use super::{apply, assignments, certs, crl, is_aborted, raw, Context};
use crate::cli::args::ApplyOptions;
use crate::prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    ListCertificates,
    ValidateCertificate,
    DisableCrl,
    ApplyToVip,
    ApplyToNode,
    ApplyToAllNodes,
    ShowAssignments,
    RawCall,
    Exit,
}

impl MenuItem {
    const ALL: [Self; 9] = [
        Self::ListCertificates,
        Self::ValidateCertificate,
        Self::DisableCrl,
        Self::ApplyToVip,
        Self::ApplyToNode,
        Self::ApplyToAllNodes,
        Self::ShowAssignments,
        Self::RawCall,
        Self::Exit,
    ];

    const fn label(self) -> &'static str {
        match self {
            Self::ListCertificates => "1) List certificates",
            Self::ValidateCertificate => "2) Validate certificate",
            Self::DisableCrl => "3) Disable CRL checking",
            Self::ApplyToVip => "4) Apply certificate to cluster VIP",
            Self::ApplyToNode => "5) Apply certificate to manager node",
            Self::ApplyToAllNodes => "6) Apply certificate to ALL manager nodes",
            Self::ShowAssignments => "7) Show current certificate assignments",
            Self::RawCall => "8) Raw API call",
            Self::Exit => "0) Exit",
        }
    }
}

pub async fn execute(ctx: Context) -> Result<()> {
    // Fail early rather than on the first menu pick
    ctx.require_credentials()?;

    let theme = ColorfulTheme::default();
    let labels: Vec<&str> = MenuItem::ALL.iter().map(|item| item.label()).collect();

    loop {
        println!();
        println!("{}", "Cluster Certificate Management".cyan().bold());
        let index = Select::with_theme(&theme)
            .with_prompt("Choose an option")
            .items(&labels)
            .default(0)
            .interact()?;
        let item = MenuItem::ALL[index];

        if item == MenuItem::Exit {
            println!("Goodbye!");
            return Ok(());
        }

        match run_item(&ctx, item).await {
            Ok(()) => {}
            Err(e) if is_aborted(&e) => {
                info!(item = ?item, "menu action aborted by operator");
                println!("{}", "Aborted.".yellow());
            }
            Err(e) => {
                error!(item = ?item, error = %e, "menu action failed");
                eprintln!("{} {e:#}", "Error:".red().bold());
            }
        }
    }
}

async fn run_item(ctx: &Context, item: MenuItem) -> Result<()> {
    match item {
        MenuItem::ListCertificates => certs::list(ctx).await,
        MenuItem::ValidateCertificate => certs::validate(ctx, None).await,
        MenuItem::DisableCrl => crl::set(ctx, false, false).await,
        MenuItem::ApplyToVip => rollout(ctx, Some(TargetSelector::Cluster)).await,
        MenuItem::ApplyToNode => {
            let client = ctx.client()?;
            let node = apply::choose_node(ctx, &client).await?;
            rollout(ctx, node.map(TargetSelector::SingleNode)).await
        }
        MenuItem::ApplyToAllNodes => rollout(ctx, Some(TargetSelector::AllNodes)).await,
        MenuItem::ShowAssignments => assignments::execute(ctx.clone()).await,
        MenuItem::RawCall => {
            let method = prompt::text("HTTP method")?;
            let path = prompt::text("Endpoint")?;
            let payload = prompt::text("Payload (or leave blank)")?;
            raw::call(ctx, &method, &path, Some(&payload)).await
        }
        MenuItem::Exit => Ok(()),
    }
}

async fn rollout(ctx: &Context, selector: Option<TargetSelector>) -> Result<()> {
    let client = ctx.client()?;
    apply::rollout(ctx, &client, ApplyOptions::default(), selector, None).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_numbered_in_order() {
        let numbers: Vec<char> = MenuItem::ALL
            .iter()
            .filter_map(|item| item.label().chars().next())
            .collect();
        assert_eq!(numbers, ['1', '2', '3', '4', '5', '6', '7', '8', '0']);
    }
}
