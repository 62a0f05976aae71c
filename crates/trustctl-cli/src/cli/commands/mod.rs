//! Command implementations.

pub mod apply;
pub mod assignments;
pub mod certs;
pub mod config;
pub mod crl;
pub mod menu;
pub mod raw;

use std::time::Duration;

use indicatif::ProgressBar;
use trustctl::{Credentials, ExpiryPolicy, TrustClient, TrustError};

use crate::config::Config;
use crate::output::{self, OutputFormat};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Manager URL
    pub manager_url: Option<String>,

    /// Manager username
    pub username: Option<String>,

    /// Manager password
    pub password: Option<String>,

    /// Skip TLS verification
    pub insecure: bool,

    /// Output format
    pub output_format: OutputFormat,

    /// Verbose output
    pub verbose: bool,

    /// Loaded configuration
    pub config: Config,
}

impl Context {
    /// Get the manager URL and credentials, returning an error if any is missing.
    pub fn require_credentials(&self) -> anyhow::Result<(&str, Credentials)> {
        match (&self.manager_url, &self.username, &self.password) {
            (Some(url), Some(user), Some(pass)) => Ok((url, Credentials::new(user, pass))),
            _ => anyhow::bail!(
                "Manager URL and credentials required.\n\n\
                 Set them with one of:\n  \
                 1. --url <URL> --username <USER> --password <PASS>\n  \
                 2. TRUSTCTL_URL, TRUSTCTL_USERNAME, TRUSTCTL_PASSWORD environment variables\n  \
                 3. trustctl config init"
            ),
        }
    }

    /// Create a client for the configured manager.
    pub fn client(&self) -> anyhow::Result<TrustClient> {
        let (url, credentials) = self.require_credentials()?;
        let client = TrustClient::builder(url, credentials)
            .timeout(Duration::from_secs(self.config.timeout_secs))
            .accept_invalid_certs(self.insecure)
            .node_scheme(self.config.node_scheme.clone())
            .user_agent(concat!("trustctl/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }

    /// Expiry policy from the configured warning window.
    pub fn policy(&self) -> ExpiryPolicy {
        ExpiryPolicy::new(self.config.expiry_warning_days)
    }

    /// Spinner for pretty output; `None` when output is machine-readable.
    pub fn spinner(&self, message: &str) -> Option<ProgressBar> {
        (self.output_format == OutputFormat::Pretty && console::user_attended())
            .then(|| output::spinner(message))
    }
}

/// Returns true if `err` is the operator backing out
pub fn is_aborted(err: &anyhow::Error) -> bool {
    err.downcast_ref::<TrustError>().is_some_and(TrustError::is_aborted)
}

/// Clear a spinner if one is showing
pub(crate) fn finish(spinner: Option<ProgressBar>) {
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credentials() {
        let ctx = Context {
            manager_url: Some("https://mgr".into()),
            username: None,
            password: Some("x".into()),
            insecure: false,
            output_format: OutputFormat::Json,
            verbose: false,
            config: Config::default(),
        };
        let err = ctx.client().unwrap_err();
        assert!(err.to_string().contains("credentials required"));
    }

    #[test]
    fn test_is_aborted() {
        assert!(is_aborted(&TrustError::AbortedByOperator.into()));
        assert!(!is_aborted(&TrustError::InvalidTarget("x".into()).into()));
        assert!(!is_aborted(&anyhow::anyhow!("aborted by operator")));
    }
}
