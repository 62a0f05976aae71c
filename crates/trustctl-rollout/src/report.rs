//! Which certificate serves what.

use crate::inventory::{Inventory, InventoryEntry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::warn;
use trustctl_client::TrustClient;
use trustctl_core::{ClusterCertificate, ExpiryPolicy, Result};

/// The VIP's certificate resource plus every certificate bound to a node's API service
#[derive(Debug, Clone, Default, Serialize)]
pub struct AssignmentReport {
    /// VIP resource as field/value pairs; empty if it couldn't be fetched
    pub vip: Vec<(String, String)>,

    /// Certificates with `service_type == "API"`, in fetch order
    pub node_certificates: Vec<InventoryEntry>,
}

impl AssignmentReport {
    /// Build the report now
    pub async fn fetch(client: &TrustClient, policy: &ExpiryPolicy) -> Result<Self> {
        Self::fetch_at(client, policy, Utc::now()).await
    }

    /// Build the report as of `now`
    pub async fn fetch_at(
        client: &TrustClient,
        policy: &ExpiryPolicy,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let vip = match client.cluster().api_certificate().await {
            Ok(resource) => resource,
            Err(e) => {
                warn!(error = %e, "could not fetch VIP certificate resource");
                ClusterCertificate::default()
            }
        };

        let certificates = client.certificates().list().await?.results;
        let inventory = Inventory::evaluate(certificates, vip.certificate_id.clone(), policy, now);

        Ok(Self {
            vip: vip.fields(),
            node_certificates: inventory.api_service_entries().cloned().collect(),
        })
    }
}
