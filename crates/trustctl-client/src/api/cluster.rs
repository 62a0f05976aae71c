//! Cluster endpoints: the VIP certificate and node topology.

use crate::TrustClient;
use trustctl_core::{ClusterCertificate, NodeList, RawResponse, Result};

const API_CERTIFICATE_PATH: &str = "/api/v1/cluster/api-certificate";
const NODES_PATH: &str = "/api/v1/cluster/nodes";

/// Cluster endpoints
pub struct ClusterApi<'a> {
    client: &'a TrustClient,
}

impl<'a> ClusterApi<'a> {
    pub(crate) fn new(client: &'a TrustClient) -> Self {
        Self { client }
    }

    /// Get the certificate currently assigned to the VIP
    pub async fn api_certificate(&self) -> Result<ClusterCertificate> {
        self.client.get(API_CERTIFICATE_PATH).await
    }

    /// Assign a certificate to the VIP
    pub async fn set_api_certificate(&self, certificate_id: &str) -> Result<RawResponse> {
        self.client
            .post_action(
                self.client.base_url(),
                API_CERTIFICATE_PATH,
                &[
                    ("action", "set_cluster_certificate"),
                    ("certificate_id", certificate_id),
                ],
            )
            .await
    }

    /// List cluster nodes in the manager's order
    pub async fn nodes(&self) -> Result<NodeList> {
        self.client.get(NODES_PATH).await
    }
}
