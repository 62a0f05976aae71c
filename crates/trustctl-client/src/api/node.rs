//! Per-node service endpoints, called on the node's own address.

use crate::TrustClient;
use trustctl_core::{RawResponse, Result};

const HTTP_SERVICE_PATH: &str = "/api/v1/node/services/http";

/// Per-node service endpoints
pub struct NodeServiceApi<'a> {
    client: &'a TrustClient,
}

impl<'a> NodeServiceApi<'a> {
    pub(crate) fn new(client: &'a TrustClient) -> Self {
        Self { client }
    }

    /// Apply a certificate to the HTTP service of the node served at `node_base_url`.
    ///
    /// `node_base_url` comes from [`TrustClient::node_base_url`].
    pub async fn apply_certificate(
        &self,
        node_base_url: &str,
        certificate_id: &str,
    ) -> Result<RawResponse> {
        self.client
            .post_action(
                node_base_url,
                HTTP_SERVICE_PATH,
                &[
                    ("action", "apply_certificate"),
                    ("certificate_id", certificate_id),
                ],
            )
            .await
    }
}
