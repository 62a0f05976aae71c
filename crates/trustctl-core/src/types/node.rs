use crate::{Result, TrustError};
use serde::{Deserialize, Serialize};

/// Manager node in the cluster topology
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Node UUID, when the manager reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Fully-qualified domain name
    #[serde(default)]
    pub fqdn: Option<String>,

    /// Management IP address
    #[serde(default)]
    pub ip_address: Option<String>,

    /// Role in the cluster (e.g. "MANAGER")
    #[serde(default)]
    pub node_role: Option<String>,
}

impl Node {
    /// Create a node addressed by FQDN
    #[must_use]
    pub fn with_fqdn(fqdn: impl Into<String>) -> Self {
        Self {
            fqdn: Some(fqdn.into()),
            ..Self::default()
        }
    }

    /// Create a node addressed by IP
    #[must_use]
    pub fn with_ip(ip: impl Into<String>) -> Self {
        Self {
            ip_address: Some(ip.into()),
            ..Self::default()
        }
    }

    /// Address used to reach the node: FQDN first, then IP. Blank values count as absent.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        non_blank(self.fqdn.as_deref()).or_else(|| non_blank(self.ip_address.as_deref()))
    }

    /// Address used to reach the node, or `InvalidTarget`
    pub fn require_address(&self) -> Result<&str> {
        self.address().ok_or_else(|| {
            TrustError::InvalidTarget(format!(
                "node {} has neither fqdn nor ip_address",
                self.id.as_deref().unwrap_or("(unidentified)")
            ))
        })
    }

    /// Display label: address, else node ID, else `node #<position>`
    #[must_use]
    pub fn label(&self, position: usize) -> String {
        self.address()
            .or_else(|| non_blank(self.id.as_deref()))
            .map_or_else(|| format!("node #{position}"), String::from)
    }

    /// Returns true if `query` exactly matches the FQDN or IP
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.fqdn.as_deref() == Some(query) || self.ip_address.as_deref() == Some(query)
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.trim().is_empty())
}

/// Cluster node listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeList {
    /// Nodes in the order the manager returned them
    pub nodes: Vec<Node>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_prefers_fqdn() {
        let node = Node {
            fqdn: Some("mgr-1.lab".into()),
            ip_address: Some("10.0.0.1".into()),
            ..Node::default()
        };
        assert_eq!(node.address(), Some("mgr-1.lab"));
        assert_eq!(Node::with_ip("10.0.0.2").address(), Some("10.0.0.2"));
    }

    #[test]
    fn test_blank_fqdn_falls_back_to_ip() {
        let node = Node {
            fqdn: Some(String::new()),
            ip_address: Some("10.0.0.3".into()),
            ..Node::default()
        };
        assert_eq!(node.address(), Some("10.0.0.3"));
    }

    #[test]
    fn test_unaddressable_node() {
        let node = Node::default();
        assert!(node.address().is_none());
        assert!(matches!(node.require_address(), Err(TrustError::InvalidTarget(_))));
        assert_eq!(node.label(2), "node #2");

        let with_id = Node {
            id: Some("uuid-7".into()),
            ..Node::default()
        };
        assert_eq!(with_id.label(0), "uuid-7");
    }

    #[test]
    fn test_matches() {
        let node = Node {
            fqdn: Some("n1".into()),
            ip_address: Some("10.0.0.1".into()),
            ..Node::default()
        };
        assert!(node.matches("n1"));
        assert!(node.matches("10.0.0.1"));
        assert!(!node.matches("n"));
    }

    #[test]
    fn test_node_list_requires_nodes_field() {
        assert!(serde_json::from_str::<NodeList>(r#"{"results": []}"#).is_err());
        let list: NodeList =
            serde_json::from_str(r#"{"nodes": [{"fqdn": "n1"}, {"ip_address": "10.0.0.2"}, {}]}"#)
                .unwrap();
        assert_eq!(list.nodes.len(), 3);
        assert!(list.nodes[2].address().is_none());
    }
}
