//! Certificate inventory with derived expiry and VIP membership.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use trustctl_client::TrustClient;
use trustctl_core::{Certificate, ExpiryPolicy, ExpiryStatus, Result};

/// A certificate plus what we derived about it
#[derive(Debug, Clone, Serialize)]
pub struct InventoryEntry {
    /// The certificate as fetched
    #[serde(flatten)]
    pub certificate: Certificate,

    /// `None` when the expiration is missing or unparseable
    pub expiry: Option<ExpiryStatus>,

    /// True iff the ID equals the VIP's certificate ID
    pub is_vip: bool,
}

/// Trust-store contents in fetch order
#[derive(Debug, Clone, Default, Serialize)]
pub struct Inventory {
    entries: Vec<InventoryEntry>,
    vip_certificate_id: Option<String>,
}

impl Inventory {
    /// Derive expiry and VIP flags for `certificates` at `now`
    #[must_use]
    pub fn evaluate(
        certificates: Vec<Certificate>,
        vip_certificate_id: Option<String>,
        policy: &ExpiryPolicy,
        now: DateTime<Utc>,
    ) -> Self {
        let entries = certificates
            .into_iter()
            .map(|certificate| {
                let expiry = certificate.expiry_status(policy, now);
                let is_vip = vip_certificate_id.as_deref() == Some(certificate.id.as_str());
                InventoryEntry {
                    certificate,
                    expiry,
                    is_vip,
                }
            })
            .collect();

        Self {
            entries,
            vip_certificate_id,
        }
    }

    /// Entries in fetch order
    #[must_use]
    pub fn entries(&self) -> &[InventoryEntry] {
        &self.entries
    }

    /// Number of certificates
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the trust store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The VIP certificate ID, if it could be fetched
    #[must_use]
    pub fn vip_certificate_id(&self) -> Option<&str> {
        self.vip_certificate_id.as_deref()
    }

    /// The entry currently serving the VIP
    #[must_use]
    pub fn vip(&self) -> Option<&InventoryEntry> {
        self.entries.iter().find(|e| e.is_vip)
    }

    /// Certificates bound to a node's API service
    pub fn api_service_entries(&self) -> impl Iterator<Item = &InventoryEntry> {
        self.entries.iter().filter(|e| e.certificate.is_api_service_cert())
    }

    /// Consume into entries
    #[must_use]
    pub fn into_entries(self) -> Vec<InventoryEntry> {
        self.entries
    }
}

/// Reads the trust store and the VIP assignment
pub struct CertificateInventory<'a> {
    client: &'a TrustClient,
    policy: ExpiryPolicy,
}

impl<'a> CertificateInventory<'a> {
    /// Create with the default expiry policy
    #[must_use]
    pub fn new(client: &'a TrustClient) -> Self {
        Self {
            client,
            policy: ExpiryPolicy::default(),
        }
    }

    /// Use a custom expiry policy
    #[must_use]
    pub const fn with_policy(mut self, policy: ExpiryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fetch and evaluate the inventory now
    pub async fn list(&self) -> Result<Inventory> {
        self.list_at(Utc::now()).await
    }

    /// Fetch and evaluate the inventory as of `now`.
    ///
    /// A failed VIP lookup only drops the VIP flag; it never fails the listing.
    pub async fn list_at(&self, now: DateTime<Utc>) -> Result<Inventory> {
        let list = self.client.certificates().list().await?;
        let vip = self.vip_certificate_id().await;
        debug!(count = list.results.len(), vip = ?vip, "fetched certificate inventory");
        Ok(Inventory::evaluate(list.results, vip, &self.policy, now))
    }

    /// The VIP's certificate ID, or `None` if it can't be determined
    pub async fn vip_certificate_id(&self) -> Option<String> {
        match self.client.cluster().api_certificate().await {
            Ok(cert) => cert.certificate_id,
            Err(e) => {
                warn!(error = %e, "could not fetch VIP certificate; continuing without it");
                None
            }
        }
    }
}
