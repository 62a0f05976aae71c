//! HTTP client for a clustered management plane's REST API.
//!
//! This crate provides [`TrustClient`], the transport every trustctl
//! operation goes through: one request at a time, basic authentication,
//! JSON bodies and a fixed timeout. Failures come back as typed
//! [`TrustError`]s rather than an empty value.

#![doc(html_root_url = "https://docs.rs/trustctl-client/0.3.0")]

mod client;
mod config;
pub mod api;

pub use client::{TrustClient, TrustClientBuilder};
pub use config::*;
pub use trustctl_core::{Result, TrustError};
