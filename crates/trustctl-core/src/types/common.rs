use crate::TrustError;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// HTTP methods accepted by the raw passthrough
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl HttpMethod {
    /// Returns true for methods that change state on the manager
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        !matches!(self, Self::Get)
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
            Self::Put => write!(f, "PUT"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

impl FromStr for HttpMethod {
    type Err = TrustError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(TrustError::Config(format!("unsupported method: {other}"))),
        }
    }
}

/// Body of a successful response, as returned by the raw passthrough
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawResponse {
    /// Body parsed as JSON
    Json(Value),
    /// Body that was not JSON
    Text(String),
    /// No body at all
    Empty,
}

impl RawResponse {
    /// Classify a response body
    #[must_use]
    pub fn from_body(body: String) -> Self {
        if body.trim().is_empty() {
            return Self::Empty;
        }
        serde_json::from_str(&body).map_or(Self::Text(body), Self::Json)
    }

    /// Returns the JSON value, if any
    #[must_use]
    pub const fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Returns true if the body carries an `error_code` field
    #[must_use]
    pub fn has_error_code(&self) -> bool {
        self.as_json()
            .and_then(Value::as_object)
            .is_some_and(|o| o.contains_key("error_code"))
    }
}

impl std::fmt::Display for RawResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(v) => write!(f, "{v}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Empty => write!(f, "(empty response)"),
        }
    }
}

/// Deserialize a boolean that the manager may send as a bool, string or number.
///
/// Values that can't be interpreted become `None` instead of failing the
/// whole document.
pub fn deserialize_bool_like<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Bool(b) => Some(b),
        Value::Number(n) => n.as_i64().map(|n| n != 0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }))
}
