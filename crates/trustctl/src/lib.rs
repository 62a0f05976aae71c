//! Inventory, validate and roll out TLS certificates across a clustered
//! management plane.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use trustctl::{Confirmation, Credentials, Orchestrator, RolloutPlan, TargetSelector, TrustClient};
//!
//! #[tokio::main]
//! async fn main() -> trustctl::Result<()> {
//!     let client = TrustClient::new("https://nsx.lab", Credentials::new("admin", "secret"))?;
//!
//!     // What's installed, and what is about to expire?
//!     let inventory = trustctl::CertificateInventory::new(&client).list().await?;
//!     for entry in inventory.entries() {
//!         println!("{} {:?}", entry.certificate.id, entry.expiry);
//!     }
//!
//!     // Push one certificate to every node
//!     let plan = RolloutPlan::new(Some("cert-id".into()), Some(TargetSelector::AllNodes))?;
//!     let summary = Orchestrator::new(&client)
//!         .concurrency(4)
//!         .execute(&plan, Confirmation::Approved)
//!         .await?;
//!     println!("{} ok, {} failed", summary.successes(), summary.failures());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Features
//!
//! - `default` - `rustls` and `rollout`
//! - `rustls` - Use rustls for TLS (recommended)
//! - `native-tls` - Use system native TLS
//! - `rollout` - Inventory, node directory and rollout orchestration

#![doc(html_root_url = "https://docs.rs/trustctl/0.3.0")]

// Re-export core types
pub use trustctl_core::*;

// Re-export client
pub use trustctl_client::{api, Credentials, TrustClient, TrustClientBuilder};

#[cfg(feature = "rollout")]
pub use trustctl_rollout::{
    selection, AssignmentReport, CertificateInventory, Inventory, InventoryEntry, NodeDirectory,
    Orchestrator, RolloutPlan, SecurityPolicyToggle, ValidationService,
};

// Re-export runtime for convenience
pub use serde;
pub use serde_json;
pub use tokio;
