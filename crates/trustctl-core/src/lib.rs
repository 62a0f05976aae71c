//! Core types for managing the TLS trust material of a clustered management plane.
//!
//! This crate provides the foundational types used across the trustctl crates:
//!
//! - **Types**: certificates, nodes, rollout targets and summaries, the
//!   global security configuration
//! - **Expiry**: [`ExpiryPolicy`] turns an expiration date into an [`ExpiryStatus`]
//! - **Errors**: one error enum, [`TrustError`], for every layer
//!
//! # Example
//!
//! ```rust,ignore
//! use trustctl_core::{Certificate, ExpiryPolicy, ExpiryStatus};
//!
//! fn warn_if_expiring(cert: &Certificate) {
//!     let now = chrono::Utc::now();
//!     if let Some(ExpiryStatus::ExpiringSoon(days)) = cert.expiry_status(&ExpiryPolicy::default(), now) {
//!         println!("{} expires in {days} days", cert.id);
//!     }
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/trustctl-core/0.3.0")]

mod error;
pub mod types;

pub use error::{Result, TrustError};
pub use types::*;
