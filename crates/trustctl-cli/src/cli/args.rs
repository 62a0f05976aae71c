//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use crate::output::OutputFormat;

/// Inventory, validate and roll out TLS certificates across a management cluster
///
/// Run without a subcommand for the interactive menu.
#[derive(Parser, Debug)]
#[command(name = "trustctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Manager URL, e.g. https://nsxmgr.local
    #[arg(long, env = "TRUSTCTL_URL", global = true)]
    pub url: Option<String>,

    /// Manager username
    #[arg(short, long, env = "TRUSTCTL_USERNAME", global = true)]
    pub username: Option<String>,

    /// Manager password
    #[arg(long, env = "TRUSTCTL_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Skip TLS certificate verification (lab use only)
    #[arg(long, global = true)]
    pub insecure: bool,

    /// Also log to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List and validate trust-store certificates
    Certs(CertsArgs),

    /// Apply a certificate to the VIP, a node, or all nodes
    Apply(ApplyArgs),

    /// CRL checking in the global security config
    Crl(CrlArgs),

    /// Show which certificates serve the VIP and each node's API
    Assignments,

    /// Send an arbitrary request to the manager API
    Raw(RawArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Start the interactive menu
    Menu,
}

// ============================================================================
// Certs command
// ============================================================================

#[derive(Args, Debug)]
pub struct CertsArgs {
    #[command(subcommand)]
    pub command: CertsCommands,
}

#[derive(Subcommand, Debug)]
pub enum CertsCommands {
    /// List installed certificates
    List,

    /// Ask the manager to validate a certificate
    Validate {
        /// Certificate ID (pick from a list if omitted)
        id: Option<String>,
    },
}

// ============================================================================
// Apply command
// ============================================================================

#[derive(Args, Debug)]
pub struct ApplyArgs {
    #[command(subcommand)]
    pub command: ApplyCommands,
}

#[derive(Subcommand, Debug)]
pub enum ApplyCommands {
    /// Make a certificate the cluster VIP certificate
    Cluster(ApplyOptions),

    /// Apply a certificate to one node's API service
    Node {
        /// Node FQDN or IP address (pick from a list if omitted)
        #[arg(long)]
        node: Option<String>,

        #[command(flatten)]
        options: ApplyOptions,
    },

    /// Apply a certificate to every node in the cluster
    AllNodes {
        /// Nodes to update at once (overrides rollout_concurrency)
        #[arg(long)]
        concurrency: Option<usize>,

        #[command(flatten)]
        options: ApplyOptions,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ApplyOptions {
    /// Certificate ID (pick from a list if omitted)
    #[arg(long = "cert")]
    pub certificate_id: Option<String>,

    /// Don't ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

// ============================================================================
// CRL command
// ============================================================================

#[derive(Args, Debug)]
pub struct CrlArgs {
    #[command(subcommand)]
    pub command: CrlCommands,
}

#[derive(Subcommand, Debug)]
pub enum CrlCommands {
    /// Turn CRL checking on
    Enable {
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Turn CRL checking off
    Disable {
        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the current security configuration
    Status,
}

// ============================================================================
// Raw command
// ============================================================================

#[derive(Args, Debug)]
pub struct RawArgs {
    /// HTTP method (GET, POST, PUT, DELETE)
    pub method: String,

    /// API path, e.g. /api/v1/cluster/status
    pub path: String,

    /// JSON request body; anything that isn't JSON is sent as a string
    #[arg(short, long)]
    pub data: Option<String>,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },

    /// Show configuration file path
    Path,

    /// Prompt for manager URL and credentials and save them
    Init,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_is_menu() {
        let cli = Cli::try_parse_from(["trustctl"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_apply_node_flags() {
        let cli = Cli::try_parse_from([
            "trustctl", "apply", "node", "--node", "10.0.0.2", "--cert", "c1", "--yes",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Apply(ApplyArgs {
                command: ApplyCommands::Node { node, options },
            })) => {
                assert_eq!(node.as_deref(), Some("10.0.0.2"));
                assert_eq!(options.certificate_id.as_deref(), Some("c1"));
                assert!(options.yes);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["trustctl", "certs", "list", "-o", "json", "--insecure"]).unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert!(cli.insecure);
    }

    #[test]
    fn test_verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
