use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Resource type of the global security configuration
pub const SECURITY_GLOBAL_CONFIG: &str = "SecurityGlobalConfig";

/// Global security configuration, guarded by an optimistic-concurrency revision
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SecurityGlobalConfig {
    /// Whether certificate revocation lists are checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crl_checking_enabled: Option<bool>,

    /// Always `SecurityGlobalConfig`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,

    /// Revision token; must be echoed back unchanged on write
    #[serde(rename = "_revision", default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,

    /// Fields this tool doesn't manage; sent back untouched
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl SecurityGlobalConfig {
    /// Full replacement payload with a new CRL flag and the same revision
    #[must_use]
    pub fn with_crl_checking(&self, enabled: bool) -> Self {
        Self {
            crl_checking_enabled: Some(enabled),
            resource_type: Some(SECURITY_GLOBAL_CONFIG.to_string()),
            ..self.clone()
        }
    }
}
