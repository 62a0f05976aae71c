//! `trustctl certs` - Certificate inventory and validation.

use anyhow::Result;
use colored::Colorize;
use tracing::info;
use trustctl::{CertificateInventory, Inventory, TrustClient, ValidationOutcome, ValidationService};

use super::{finish, Context};
use crate::cli::args::{CertsArgs, CertsCommands};
use crate::output::{self, print_structured};
use crate::prompt;

pub async fn execute(ctx: Context, args: CertsArgs) -> Result<()> {
    match args.command {
        CertsCommands::List => list(&ctx).await,
        CertsCommands::Validate { id } => validate(&ctx, id).await,
    }
}

/// Fetch and print the inventory
pub async fn list(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let inventory = fetch_inventory(ctx, &client).await?;
    output::print_inventory(ctx.output_format, &inventory)
}

/// Validate `id`, or a certificate picked from the inventory
pub async fn validate(ctx: &Context, id: Option<String>) -> Result<()> {
    let client = ctx.client()?;
    let Some(id) = (match id {
        Some(id) => Some(id),
        None => choose_certificate(ctx, &client).await?,
    }) else {
        info!("validation cancelled");
        return Ok(());
    };

    let spinner = ctx.spinner("Waiting for manager API...");
    let outcome = ValidationService::new(&client).validate(&id).await;
    finish(spinner);

    if print_structured(ctx.output_format, &outcome)? {
        return Ok(());
    }
    match outcome {
        ValidationOutcome::Valid => println!("{}", "Validation result: OK".green().bold()),
        ValidationOutcome::Invalid(detail) => {
            println!("{} {detail}", "Validation error:".red().bold());
        }
    }
    Ok(())
}

pub(crate) async fn fetch_inventory(ctx: &Context, client: &TrustClient) -> Result<Inventory> {
    let spinner = ctx.spinner("Waiting for manager API...");
    let inventory = CertificateInventory::new(client)
        .with_policy(ctx.policy())
        .list()
        .await;
    finish(spinner);
    Ok(inventory?)
}

/// Print the inventory in pretty form and ask for a pick
pub(crate) async fn choose_certificate(ctx: &Context, client: &TrustClient) -> Result<Option<String>> {
    let inventory = fetch_inventory(ctx, client).await?;
    if inventory.is_empty() {
        println!("{}", "No certificates found.".red());
        return Ok(None);
    }
    output::print_inventory(output::OutputFormat::Pretty, &inventory)?;
    prompt::pick_certificate(&inventory)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::context_for;
    use crate::output::OutputFormat;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_survives_vip_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/trust-management/certificates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": [{"id": "c1"}]})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/cluster/api-certificate"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let ctx = context_for(&server, OutputFormat::Json);
        list(&ctx).await.unwrap();
    }

    #[tokio::test]
    async fn test_validate_by_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/trust-management/certificates/c1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "OK"})))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context_for(&server, OutputFormat::Json);
        validate(&ctx, Some("c1".into())).await.unwrap();
    }
}
