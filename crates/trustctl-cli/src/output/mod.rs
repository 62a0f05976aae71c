//! Output formatting for different formats.

use anyhow::Result;
use clap::ValueEnum;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;
use tabled::{settings::Style, Table, Tabled};
use trustctl::{AssignmentOutcome, AssignmentReport, ExpiryStatus, Inventory, InventoryEntry, Node, RolloutSummary};

/// Placeholder for missing values
pub const MISSING: &str = "-";

/// Available output formats.
#[derive(Debug, Clone, Copy, Default, ValueEnum, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed tables with colors
    #[default]
    Pretty,
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// YAML output
    Yaml,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pretty" | "table" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "yaml" | "yml" => Ok(Self::Yaml),
            _ => anyhow::bail!(
                "Unknown output format: {}\n\
                 Valid formats: pretty, json, csv, yaml",
                s
            ),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pretty => write!(f, "pretty"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Yaml => write!(f, "yaml"),
        }
    }
}

/// Print `value` as JSON or YAML. Returns false for formats that need a
/// command-specific rendering.
pub fn print_structured<T: Serialize + ?Sized>(format: OutputFormat, value: &T) -> Result<bool> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Yaml => print!("{}", serde_yaml::to_string(value)?),
        OutputFormat::Pretty | OutputFormat::Csv => return Ok(false),
    }
    Ok(true)
}

/// Write rows as CSV to stdout
pub fn print_csv<T: Serialize>(rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(std::io::stdout());
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Spinner shown while waiting on the manager
pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

// ============================================================================
// Certificates
// ============================================================================

#[derive(Tabled, Serialize)]
pub struct CertificateRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "ID")]
    pub id: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Category")]
    pub category: String,
    #[tabled(rename = "Type")]
    pub cert_type: String,
    #[tabled(rename = "Subject CN")]
    pub subject_cn: String,
    #[tabled(rename = "Issuer CN")]
    pub issuer_cn: String,
    #[tabled(rename = "Expires")]
    pub expires: String,
    #[tabled(rename = "In Use")]
    pub in_use: String,
}

impl CertificateRow {
    /// Build a row; `colored` adds VIP and expiry highlighting
    pub fn new(index: usize, entry: &InventoryEntry, colored: bool) -> Self {
        let cert = &entry.certificate;
        let name = cert.display_name.clone().unwrap_or_else(|| MISSING.to_string());
        let name = match (entry.is_vip, colored) {
            (true, true) => format!("{name} (VIP)").green().bold().to_string(),
            (true, false) => format!("{name} (VIP)"),
            (false, _) => name,
        };

        Self {
            index,
            id: cert.id.clone(),
            name,
            category: or_missing(cert.category.as_deref()),
            cert_type: or_missing(cert.cert_type.as_deref()),
            subject_cn: or_missing(cert.subject_cn.as_deref()),
            issuer_cn: or_missing(cert.issuer_cn.as_deref()),
            expires: expiry_cell(entry, colored),
            in_use: cert.in_use.map_or_else(|| MISSING.to_string(), |b| b.to_string()),
        }
    }
}

fn or_missing(value: Option<&str>) -> String {
    value
        .filter(|s| !s.is_empty())
        .map_or_else(|| MISSING.to_string(), String::from)
}

/// Expiration date plus its annotation, colored by status
pub fn expiry_cell(entry: &InventoryEntry, colored: bool) -> String {
    let Some(date) = &entry.certificate.expiration_date else {
        return MISSING.to_string();
    };
    let Some(status) = entry.expiry else {
        return date.to_string();
    };

    let text = match status.annotation() {
        Some(note) => format!("{date} {note}"),
        None => date.to_string(),
    };
    if !colored {
        return text;
    }
    match status {
        ExpiryStatus::Expired => text.red().bold().to_string(),
        ExpiryStatus::ExpiringSoon(_) => text.yellow().to_string(),
        ExpiryStatus::Valid => text,
    }
}

/// Render the certificate inventory
pub fn print_inventory(format: OutputFormat, inventory: &Inventory) -> Result<()> {
    if print_structured(format, inventory.entries())? {
        return Ok(());
    }

    let colored = format == OutputFormat::Pretty;
    let rows: Vec<CertificateRow> = inventory
        .entries()
        .iter()
        .enumerate()
        .map(|(i, entry)| CertificateRow::new(i, entry, colored))
        .collect();

    if !colored {
        return print_csv(&rows);
    }

    if rows.is_empty() {
        println!("  No certificates found.");
        return Ok(());
    }

    println!("{}", Table::new(&rows).with(Style::rounded()));
    if inventory.vip_certificate_id().is_none() {
        println!("{}", "VIP certificate unknown; nothing highlighted.".dimmed());
    }
    Ok(())
}

// ============================================================================
// Nodes
// ============================================================================

#[derive(Tabled, Serialize)]
pub struct NodeRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "FQDN")]
    pub fqdn: String,
    #[tabled(rename = "IP Address")]
    pub ip_address: String,
    #[tabled(rename = "Role")]
    pub role: String,
}

/// Numbered node table for pickers
pub fn print_nodes(nodes: &[Node]) {
    let rows: Vec<NodeRow> = nodes
        .iter()
        .enumerate()
        .map(|(index, node)| NodeRow {
            index,
            fqdn: or_missing(node.fqdn.as_deref()),
            ip_address: or_missing(node.ip_address.as_deref()),
            role: or_missing(node.node_role.as_deref()),
        })
        .collect();
    println!("{}", Table::new(&rows).with(Style::rounded()));
}

// ============================================================================
// Rollout summary
// ============================================================================

#[derive(Tabled, Serialize)]
pub struct OutcomeRow {
    #[tabled(rename = "Target")]
    pub target: String,
    #[tabled(rename = "Result")]
    pub outcome: String,
}

/// Render a rollout summary
pub fn print_summary(format: OutputFormat, summary: &RolloutSummary) -> Result<()> {
    if print_structured(format, summary)? {
        return Ok(());
    }

    let colored = format == OutputFormat::Pretty;
    let rows: Vec<OutcomeRow> = summary
        .iter()
        .map(|r| OutcomeRow {
            target: r.target_label.clone(),
            outcome: match (&r.outcome, colored) {
                (AssignmentOutcome::Success, true) => r.outcome.to_string().green().to_string(),
                (AssignmentOutcome::Failure(_), true) => r.outcome.to_string().red().to_string(),
                (_, false) => r.outcome.to_string(),
            },
        })
        .collect();

    if !colored {
        return print_csv(&rows);
    }

    if rows.is_empty() {
        println!("  No targets.");
        return Ok(());
    }

    println!("{}", Table::new(&rows).with(Style::rounded()));
    let tally = format!("{} succeeded, {} failed", summary.successes(), summary.failures());
    if summary.all_succeeded() {
        println!("{}", tally.green().bold());
    } else {
        println!("{}", tally.red().bold());
    }
    Ok(())
}

// ============================================================================
// Assignment report
// ============================================================================

#[derive(Tabled, Serialize)]
pub struct FieldRow {
    #[tabled(rename = "Field")]
    pub field: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Tabled, Serialize)]
pub struct NodeCertificateRow {
    #[tabled(rename = "Node ID")]
    pub node_id: String,
    #[tabled(rename = "Certificate")]
    pub name: String,
    #[tabled(rename = "In Use")]
    pub in_use: String,
    #[tabled(rename = "Expires")]
    pub expires: String,
}

/// Render the VIP and per-node certificate assignments
pub fn print_report(format: OutputFormat, report: &AssignmentReport) -> Result<()> {
    if print_structured(format, report)? {
        return Ok(());
    }

    let colored = format == OutputFormat::Pretty;
    let nodes: Vec<NodeCertificateRow> = report
        .node_certificates
        .iter()
        .map(|entry| NodeCertificateRow {
            node_id: or_missing(entry.certificate.node_id.as_deref()),
            name: or_missing(entry.certificate.display_name.as_deref()),
            in_use: entry
                .certificate
                .in_use
                .map_or_else(|| MISSING.to_string(), |b| b.to_string()),
            expires: expiry_cell(entry, colored),
        })
        .collect();

    if !colored {
        return print_csv(&nodes);
    }

    println!("{}", "Cluster VIP certificate assignment:".blue().bold());
    if report.vip.is_empty() {
        println!("  {}", "(unavailable)".dimmed());
    } else {
        let fields: Vec<FieldRow> = report
            .vip
            .iter()
            .map(|(field, value)| FieldRow {
                field: field.clone(),
                value: value.clone(),
            })
            .collect();
        println!("{}", Table::new(&fields).with(Style::rounded()));
    }

    println!();
    println!("{}", "Manager node certificate assignments:".blue().bold());
    if nodes.is_empty() {
        println!("  No API service certificates found.");
    } else {
        println!("{}", Table::new(&nodes).with(Style::rounded()));
    }
    Ok(())
}
