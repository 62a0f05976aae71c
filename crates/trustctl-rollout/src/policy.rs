//! Global security policy toggles.

use tracing::info;
use trustctl_client::TrustClient;
use trustctl_core::{Confirmation, Result, SecurityGlobalConfig, TrustError};

/// Reads and rewrites the CRL-checking flag of the global security config
pub struct SecurityPolicyToggle<'a> {
    client: &'a TrustClient,
}

impl<'a> SecurityPolicyToggle<'a> {
    #[must_use]
    pub const fn new(client: &'a TrustClient) -> Self {
        Self { client }
    }

    /// Current global security configuration
    pub async fn status(&self) -> Result<SecurityGlobalConfig> {
        self.client.global_configs().security().await
    }

    /// Set CRL checking to `enabled`.
    ///
    /// Reads the config first and writes it back whole with the new flag and
    /// the revision that was read. If someone else updated it in between the
    /// manager rejects the write and this returns `StaleRevision`. A failed
    /// read aborts before any write.
    pub async fn set_crl_checking(
        &self,
        enabled: bool,
        confirmation: Confirmation,
    ) -> Result<SecurityGlobalConfig> {
        if !confirmation.is_approved() {
            info!(enabled, "CRL change declined by operator");
            return Err(TrustError::AbortedByOperator);
        }

        let current = self.status().await?;
        let revision = current.revision.ok_or_else(|| {
            TrustError::MalformedResponse("security config has no _revision".to_string())
        })?;

        let updated = self
            .client
            .global_configs()
            .update_security(&current.with_crl_checking(enabled))
            .await?;

        info!(enabled, revision, "CRL checking updated");
        Ok(updated)
    }
}
