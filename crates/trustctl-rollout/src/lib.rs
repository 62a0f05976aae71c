//! Certificate inventory and rollout orchestration for a clustered manager.
//!
//! Everything here sits on top of [`trustctl_client::TrustClient`]:
//!
//! - [`CertificateInventory`] lists the trust store with derived expiry and VIP flags
//! - [`NodeDirectory`] reads the cluster topology
//! - [`Orchestrator`] rolls a certificate out to the VIP, one node, or every node
//! - [`ValidationService`] and [`SecurityPolicyToggle`] are single-shot operations
//!
//! Mutating operations take an explicit [`Confirmation`](trustctl_core::Confirmation)
//! so the front end decides how the operator is asked.

#![doc(html_root_url = "https://docs.rs/trustctl-rollout/0.3.0")]

mod directory;
mod inventory;
mod orchestrator;
mod policy;
mod report;
pub mod selection;
mod validation;

pub use directory::NodeDirectory;
pub use inventory::{CertificateInventory, Inventory, InventoryEntry};
pub use orchestrator::{Orchestrator, RolloutPlan};
pub use policy::SecurityPolicyToggle;
pub use report::AssignmentReport;
pub use validation::ValidationService;
