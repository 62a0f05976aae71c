//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use tracing::{debug, info};

use crate::config::Config;
use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    // Load configuration, running first-time setup when there's none
    let mut config = Config::load()?;
    let needs_setup = !Config::path()?.exists() && cli.url.is_none() && !config.is_complete();
    if needs_setup && !matches!(cli.command, Some(Commands::Config(_))) && console::user_attended() {
        crate::prompt::setup(&mut config)?;
        config.save()?;
        println!("Saved to {}", Config::path()?.display());
    }

    let (_guard, log_dir) = crate::logging::init(&config.log_dir()?, cli.verbose)?;
    debug!(log_dir = %log_dir.display(), "logging initialized");

    // Determine output format
    let output_format = cli
        .output
        .or(config.output_format)
        .unwrap_or(OutputFormat::Pretty);

    // Flags and environment win over the config file
    let ctx = commands::Context {
        manager_url: cli.url.or_else(|| config.manager_url.clone()),
        username: cli.username.or_else(|| config.username.clone()),
        password: cli.password.or_else(|| config.password.clone()),
        insecure: cli.insecure || config.insecure_skip_verify,
        output_format,
        verbose: cli.verbose,
        config,
    };

    let result = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Certs(args) => commands::certs::execute(ctx, args).await,
        Commands::Apply(args) => commands::apply::execute(ctx, args).await,
        Commands::Crl(args) => commands::crl::execute(ctx, args).await,
        Commands::Assignments => commands::assignments::execute(ctx).await,
        Commands::Raw(args) => commands::raw::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(ctx, args).await,
        Commands::Menu => commands::menu::execute(ctx).await,
    };

    match result {
        Err(e) if commands::is_aborted(&e) => {
            info!("operation aborted by operator");
            Ok(())
        }
        other => other,
    }
}
