//! Configuration management.

use anyhow::{Context as _, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// Manager URL, e.g. `https://nsxmgr.local`.
    pub manager_url: Option<String>,

    /// Manager username.
    pub username: Option<String>,

    /// Manager password.
    pub password: Option<String>,

    /// Skip TLS certificate verification.
    #[serde(default)]
    pub insecure_skip_verify: bool,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Certificates expiring within this many days are flagged.
    #[serde(default = "default_expiry_warning_days")]
    pub expiry_warning_days: i64,

    /// Nodes updated at once during an all-nodes rollout.
    #[serde(default = "default_rollout_concurrency")]
    pub rollout_concurrency: usize,

    /// Scheme used to reach nodes directly.
    #[serde(default = "default_node_scheme")]
    pub node_scheme: String,

    /// Log directory; `~` is expanded.
    pub log_dir: Option<String>,

    /// Default output format.
    pub output_format: Option<OutputFormat>,
}

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_expiry_warning_days() -> i64 {
    trustctl::DEFAULT_EXPIRY_WARNING_DAYS
}

const fn default_rollout_concurrency() -> usize {
    1
}

fn default_node_scheme() -> String {
    "https".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            manager_url: None,
            username: None,
            password: None,
            insecure_skip_verify: false,
            timeout_secs: default_timeout_secs(),
            expiry_warning_days: default_expiry_warning_days(),
            rollout_concurrency: default_rollout_concurrency(),
            node_scheme: default_node_scheme(),
            log_dir: None,
            output_format: None,
        }
    }
}

/// Keys accepted by `config set`
pub const KEYS: &[(&str, &str)] = &[
    ("manager_url", "Manager URL (https://...)"),
    ("username", "Manager username"),
    ("password", "Manager password"),
    ("insecure_skip_verify", "Skip TLS verification (true/false)"),
    ("timeout_secs", "Per-request timeout in seconds"),
    ("expiry_warning_days", "Days before expiry to flag a certificate"),
    ("rollout_concurrency", "Nodes updated at once in an all-nodes rollout"),
    ("node_scheme", "Scheme for direct node calls (https/http)"),
    ("log_dir", "Log directory"),
    ("output_format", "Default output format (pretty/json/csv/yaml)"),
];

impl Config {
    /// Get the config file path.
    pub fn path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Load configuration from file.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, or defaults if it doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to `path`, readable by the owner only.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        write_private(path, content.as_bytes())
            .with_context(|| format!("Could not write {}", path.display()))?;

        Ok(())
    }

    /// Set `key` from its string form.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "manager_url" | "url" => self.manager_url = Some(value.trim_end_matches('/').to_string()),
            "username" | "user" => self.username = Some(value.to_string()),
            "password" => self.password = Some(value.to_string()),
            "insecure_skip_verify" | "insecure" => self.insecure_skip_verify = value.parse()?,
            "timeout_secs" | "timeout" => self.timeout_secs = value.parse()?,
            "expiry_warning_days" => self.expiry_warning_days = value.parse()?,
            "rollout_concurrency" => {
                let n: usize = value.parse()?;
                anyhow::ensure!(n > 0, "rollout_concurrency must be at least 1");
                self.rollout_concurrency = n;
            }
            "node_scheme" => {
                anyhow::ensure!(
                    matches!(value, "https" | "http"),
                    "node_scheme must be https or http"
                );
                self.node_scheme = value.to_string();
            }
            "log_dir" => self.log_dir = Some(value.to_string()),
            "output_format" | "output" => self.output_format = Some(value.parse()?),
            _ => {
                let keys: Vec<String> = KEYS
                    .iter()
                    .map(|(k, help)| format!("  {k:<22} - {help}"))
                    .collect();
                anyhow::bail!(
                    "Unknown config key: {key}\n\nAvailable keys:\n{}",
                    keys.join("\n")
                );
            }
        }
        Ok(())
    }

    /// True once URL, username and password are all present.
    pub fn is_complete(&self) -> bool {
        [&self.manager_url, &self.username, &self.password]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.is_empty()))
    }

    /// Copy with the password masked, for display.
    #[must_use]
    pub fn masked(&self) -> Self {
        Self {
            password: self.password.as_ref().map(|_| "********".to_string()),
            ..self.clone()
        }
    }

    /// Directory for log files: `log_dir` with `~` expanded, else the platform data dir.
    pub fn log_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.log_dir {
            return Ok(PathBuf::from(shellexpand::tilde(dir).into_owned()));
        }
        Ok(project_dirs()?.data_local_dir().join("logs"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("io", "trustctl", "trustctl")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode() only applies on creation
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(content)
}

#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.expiry_warning_days, 30);
        assert_eq!(config.rollout_concurrency, 1);
        assert_eq!(config.node_scheme, "https");
        assert!(!config.insecure_skip_verify);
        assert!(!config.is_complete());
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "manager_url = \"https://mgr\"\nrollout_concurrency = 4\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.manager_url.as_deref(), Some("https://mgr"));
        assert_eq!(config.rollout_concurrency, 4);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("url", "https://mgr.lab/").unwrap();
        config.set("username", "admin").unwrap();
        config.set("password", "hunter2").unwrap();
        config.set("output_format", "json").unwrap();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.manager_url.as_deref(), Some("https://mgr.lab"));
        assert_eq!(loaded.output_format, Some(OutputFormat::Json));
        assert!(loaded.is_complete());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        Config::default().save_to(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("rollout_concurrency", "0").is_err());
        assert!(config.set("node_scheme", "ftp").is_err());
        assert!(config.set("timeout_secs", "soon").is_err());
        assert!(config.set("api_key", "x").is_err());
    }

    #[test]
    fn test_masked() {
        let mut config = Config::default();
        config.password = Some("hunter2".into());
        assert_eq!(config.masked().password.as_deref(), Some("********"));
        assert!(Config::default().masked().password.is_none());
    }

    #[test]
    fn test_log_dir_expands_tilde() {
        let config = Config {
            log_dir: Some("~/trustctl-logs".into()),
            ..Config::default()
        };
        let dir = config.log_dir().unwrap();
        assert!(!dir.to_string_lossy().starts_with('~'));
        assert!(dir.ends_with("trustctl-logs"));
    }
}
