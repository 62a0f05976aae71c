//! Trust-store endpoints.

use crate::TrustClient;
use trustctl_core::{CertificateList, RawResponse, Result};

const CERTIFICATES_PATH: &str = "/api/v1/trust-management/certificates";

/// Trust-store endpoints
pub struct TrustManagementApi<'a> {
    client: &'a TrustClient,
}

impl<'a> TrustManagementApi<'a> {
    pub(crate) fn new(client: &'a TrustClient) -> Self {
        Self { client }
    }

    /// List installed certificates in the manager's order
    pub async fn list(&self) -> Result<CertificateList> {
        self.client.get(CERTIFICATES_PATH).await
    }

    /// Ask the manager to validate one certificate
    pub async fn validate(&self, certificate_id: &str) -> Result<RawResponse> {
        self.client
            .get_item_raw(CERTIFICATES_PATH, certificate_id, &[("action", "validate")])
            .await
    }
}
