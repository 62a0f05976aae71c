//! # trustctl-cli
//!
//! Command-line front end for the `trustctl` libraries.
//!
//! ## Features
//!
//! - **Inventory**: list trust-store certificates with expiry and VIP highlighting
//! - **Rollout**: apply a certificate to the cluster VIP, one node, or every node
//! - **Policy**: enable, disable or inspect CRL checking
//! - **Interactive menu**: the default when no subcommand is given
//! - **Multiple output formats**: Pretty tables, JSON, CSV, YAML

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;
pub mod prompt;

pub use cli::run;
