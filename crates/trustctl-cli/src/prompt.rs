//! Interactive prompts.
//!
//! Pickers take an index into the list just printed, or `b` to go back.
//! A bad index is reported and asked again; it never ends the command.

use anyhow::Result;
use colored::Colorize;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password};
use trustctl::selection::{self, BACK};
use trustctl::{Confirmation, Inventory, Node, Selection};

use crate::config::Config;

/// Ask until `parse` accepts the answer or fails with something other than a bad pick
pub fn pick<T>(
    prompt: &str,
    parse: impl Fn(&str) -> trustctl::Result<Selection<T>>,
) -> Result<Option<T>> {
    let theme = ColorfulTheme::default();
    loop {
        let input: String = Input::with_theme(&theme)
            .with_prompt(prompt)
            .interact_text()?;

        match parse(&input) {
            Ok(selection) => return Ok(selection.into_option()),
            Err(e) if e.is_invalid_selection() => {
                eprintln!("{} {e}", "Invalid selection:".red().bold());
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Pick a certificate from an inventory that has already been printed
pub fn pick_certificate(inventory: &Inventory) -> Result<Option<String>> {
    if inventory.is_empty() {
        return Ok(None);
    }
    let prompt = format!(
        "Pick certificate by index (0-{}) or '{BACK}' to go back",
        inventory.len() - 1
    );
    pick(&prompt, |input| selection::pick_certificate(inventory, input))
}

/// Pick a node from a list that has already been printed
pub fn pick_node(nodes: &[Node]) -> Result<Option<Node>> {
    if nodes.is_empty() {
        return Ok(None);
    }
    let prompt = format!(
        "Pick node by index (0-{}) or '{BACK}' to go back",
        nodes.len() - 1
    );
    pick(&prompt, |input| selection::pick_node(nodes, input))
}

/// Ask a yes/no question, defaulting to no. `assume_yes` skips the prompt.
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<Confirmation> {
    if assume_yes {
        return Ok(Confirmation::Approved);
    }
    let answer = Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?;
    Ok(Confirmation::from(answer))
}

/// Free-form text, empty allowed
pub fn text(prompt: &str) -> Result<String> {
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()?;
    Ok(value.trim().to_string())
}

/// First-run setup: ask for the manager URL and credentials
pub fn setup(config: &mut Config) -> Result<()> {
    let theme = ColorfulTheme::default();
    println!("{}", "=== trustctl setup ===".yellow().bold());

    let mut url = Input::<String>::with_theme(&theme)
        .with_prompt("Manager URL (e.g. https://nsxmgr.local)");
    if let Some(current) = &config.manager_url {
        url = url.default(current.clone());
    }
    let url = url.interact_text()?;

    let mut username = Input::<String>::with_theme(&theme).with_prompt("Username");
    if let Some(current) = &config.username {
        username = username.default(current.clone());
    }
    let username = username.interact_text()?;

    let password = Password::with_theme(&theme)
        .with_prompt("Password")
        .interact()?;

    config.set("manager_url", url.trim())?;
    config.set("username", username.trim())?;
    config.set("password", &password)?;
    Ok(())
}
