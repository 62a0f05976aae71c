//! Cluster node topology.

use tracing::debug;
use trustctl_client::TrustClient;
use trustctl_core::{Node, Result, TrustError};

/// Reads the cluster's node list and resolves node addresses
pub struct NodeDirectory<'a> {
    client: &'a TrustClient,
}

impl<'a> NodeDirectory<'a> {
    /// Create a directory backed by `client`
    #[must_use]
    pub const fn new(client: &'a TrustClient) -> Self {
        Self { client }
    }

    /// Fetch the node list in the manager's order.
    ///
    /// A missing `nodes` field is a `MalformedResponse`, not an empty cluster.
    pub async fn list(&self) -> Result<Vec<Node>> {
        let list = self.client.cluster().nodes().await?;
        debug!(count = list.nodes.len(), "fetched cluster nodes");
        Ok(list.nodes)
    }

    /// Base URL of the node's own API endpoint
    pub fn target_address(&self, node: &Node) -> Result<String> {
        Ok(self.client.node_base_url(node.require_address()?))
    }

    /// Fetch the node list and find the node whose FQDN or IP equals `query`
    pub async fn find(&self, query: &str) -> Result<Node> {
        let nodes = self.list().await?;
        let len = nodes.len();
        nodes
            .into_iter()
            .find(|n| n.matches(query))
            .ok_or_else(|| TrustError::InvalidUserSelection {
                input: query.to_string(),
                len,
            })
    }
}
