use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The cluster's `api-certificate` resource (the certificate behind the VIP)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterCertificate {
    /// ID of the certificate currently serving the VIP
    #[serde(default)]
    pub certificate_id: Option<String>,

    /// Remaining fields, kept for display
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl ClusterCertificate {
    /// All fields as display pairs, `certificate_id` first
    #[must_use]
    pub fn fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::with_capacity(self.other.len() + 1);
        if let Some(id) = &self.certificate_id {
            fields.push(("certificate_id".to_string(), id.clone()));
        }
        for (key, value) in &self.other {
            let shown = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            fields.push((key.clone(), shown));
        }
        fields
    }
}
