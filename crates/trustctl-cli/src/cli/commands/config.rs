//! `trustctl config` - CLI configuration management.

use anyhow::Result;
use colored::Colorize;

use super::Context;
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::print_structured;
use crate::prompt;

pub async fn execute(ctx: Context, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx),
        ConfigCommands::Set { key, value } => set_config(&key, &value),
        ConfigCommands::Path => show_path(),
        ConfigCommands::Init => init_config(),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = Config::load()?.masked();

    if print_structured(ctx.output_format, &config)? {
        return Ok(());
    }

    println!("{}", "Current Configuration:".bold());
    println!();

    let not_set = || "(not set)".dimmed().to_string();
    println!("  {} {}", "manager_url:".bold(), config.manager_url.clone().unwrap_or_else(not_set));
    println!("  {} {}", "username:".bold(), config.username.clone().unwrap_or_else(not_set));
    println!("  {} {}", "password:".bold(), config.password.clone().unwrap_or_else(not_set));
    println!("  {} {}", "insecure_skip_verify:".bold(), config.insecure_skip_verify);
    println!("  {} {}", "timeout_secs:".bold(), config.timeout_secs);
    println!("  {} {}", "expiry_warning_days:".bold(), config.expiry_warning_days);
    println!("  {} {}", "rollout_concurrency:".bold(), config.rollout_concurrency);
    println!("  {} {}", "node_scheme:".bold(), config.node_scheme);
    println!("  {} {}", "log_dir:".bold(), config.log_dir()?.display());
    println!(
        "  {} {}",
        "output_format:".bold(),
        config.output_format.unwrap_or_default()
    );

    Ok(())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, value)?;
    config.save()?;

    let shown = if key == "password" { "********" } else { value };
    println!("{} {} set to {}.", "Success:".green().bold(), key, shown.cyan());
    Ok(())
}

fn show_path() -> Result<()> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(())
}

fn init_config() -> Result<()> {
    let mut config = Config::load()?;
    prompt::setup(&mut config)?;
    config.save()?;
    println!(
        "{} Saved to {}",
        "Success:".green().bold(),
        Config::path()?.display()
    );
    Ok(())
}
