//! `trustctl crl` - CRL checking in the global security config.

use anyhow::Result;
use colored::Colorize;
use trustctl::{SecurityGlobalConfig, SecurityPolicyToggle};

use super::{finish, Context};
use crate::cli::args::{CrlArgs, CrlCommands};
use crate::output::print_structured;
use crate::prompt;

pub async fn execute(ctx: Context, args: CrlArgs) -> Result<()> {
    match args.command {
        CrlCommands::Enable { yes } => set(&ctx, true, yes).await,
        CrlCommands::Disable { yes } => set(&ctx, false, yes).await,
        CrlCommands::Status => status(&ctx).await,
    }
}

/// Confirm, then write the new flag
pub async fn set(ctx: &Context, enabled: bool, assume_yes: bool) -> Result<()> {
    let client = ctx.client()?;
    let question = if enabled {
        "Are you sure you want to enable CRL checking?"
    } else {
        "Are you sure you want to disable CRL checking?"
    };
    let confirmation = prompt::confirm(question, assume_yes)?;

    let spinner = ctx.spinner("Waiting for manager API...");
    let result = SecurityPolicyToggle::new(&client)
        .set_crl_checking(enabled, confirmation)
        .await;
    finish(spinner);

    let updated = match result {
        Ok(updated) => updated,
        Err(e) if e.is_aborted() => {
            println!("{}", "Aborted.".yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    print_config(ctx, &updated)
}

async fn status(ctx: &Context) -> Result<()> {
    let client = ctx.client()?;
    let spinner = ctx.spinner("Waiting for manager API...");
    let current = SecurityPolicyToggle::new(&client).status().await;
    finish(spinner);
    print_config(ctx, &current?)
}

fn print_config(ctx: &Context, config: &SecurityGlobalConfig) -> Result<()> {
    if print_structured(ctx.output_format, config)? {
        return Ok(());
    }

    let state = match config.crl_checking_enabled {
        Some(true) => "enabled".green().bold(),
        Some(false) => "disabled".yellow().bold(),
        None => "unknown".dimmed(),
    };
    println!("  {} {}", "CRL checking:".bold(), state);
    if let Some(revision) = config.revision {
        println!("  {} {}", "Revision:".bold(), revision);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::test_support::context_for;
    use crate::output::OutputFormat;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_enable_with_yes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/global-configs/SecurityGlobalConfig"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "crl_checking_enabled": false,
                "_revision": 9
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/global-configs/SecurityGlobalConfig"))
            .and(body_partial_json(json!({"crl_checking_enabled": true, "_revision": 9})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "crl_checking_enabled": true,
                "_revision": 10
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = context_for(&server, OutputFormat::Json);
        set(&ctx, true, true).await.unwrap();
    }
}
