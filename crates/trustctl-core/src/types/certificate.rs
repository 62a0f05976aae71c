use super::common::deserialize_bool_like;
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Days before expiry at which a certificate is flagged as expiring soon
pub const DEFAULT_EXPIRY_WARNING_DAYS: i64 = 30;

/// Certificate installed in the manager's trust store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certificate {
    /// Unique certificate ID
    pub id: String,

    /// Human-readable name
    #[serde(default)]
    pub display_name: Option<String>,

    /// Category (e.g. "CA", "Server")
    #[serde(default)]
    pub category: Option<String>,

    /// Certificate type
    #[serde(default, rename = "type")]
    pub cert_type: Option<String>,

    /// Subject common name
    #[serde(default)]
    pub subject_cn: Option<String>,

    /// Issuer common name
    #[serde(default)]
    pub issuer_cn: Option<String>,

    /// Expiration timestamp as reported by the manager
    #[serde(default)]
    pub expiration_date: Option<ExpirationDate>,

    /// Whether the certificate is bound to any service
    #[serde(default, deserialize_with = "deserialize_bool_like")]
    pub in_use: Option<bool>,

    /// Service the certificate is bound to ("API" for a node's API service)
    #[serde(default)]
    pub service_type: Option<String>,

    /// Node owning the service binding
    #[serde(default)]
    pub node_id: Option<String>,
}

impl Certificate {
    /// Returns true if the certificate is bound to a node's API service
    #[must_use]
    pub fn is_api_service_cert(&self) -> bool {
        self.service_type.as_deref() == Some("API")
    }

    /// Expiry status at `now`, or `None` when the expiration is absent or unparseable
    #[must_use]
    pub fn expiry_status(&self, policy: &ExpiryPolicy, now: DateTime<Utc>) -> Option<ExpiryStatus> {
        let expires_at = self.expiration_date.as_ref()?.to_datetime()?;
        Some(policy.evaluate(expires_at, now))
    }
}

/// Trust-store listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CertificateList {
    /// Certificates in the order the manager returned them
    pub results: Vec<Certificate>,

    /// Total count reported by the manager
    #[serde(default)]
    pub result_count: Option<u64>,
}

/// Expiration value; managers send either a timestamp string or epoch milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpirationDate {
    /// Milliseconds since the Unix epoch
    EpochMillis(i64),
    /// Timestamp text, e.g. `2024-01-01T00:00:00.000Z`
    Timestamp(String),
    /// Anything else; never parsed
    Unrecognized(Value),
}

impl ExpirationDate {
    /// Parse into an absolute UTC instant
    #[must_use]
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::EpochMillis(ms) => DateTime::from_timestamp_millis(*ms),
            Self::Timestamp(s) => parse_timestamp(s),
            Self::Unrecognized(_) => None,
        }
    }
}

impl std::fmt::Display for ExpirationDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timestamp(s) => write!(f, "{s}"),
            Self::EpochMillis(_) => match self.to_datetime() {
                Some(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.3fZ")),
                None => write!(f, "-"),
            },
            Self::Unrecognized(v) => write!(f, "{v}"),
        }
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Derived expiry state of a certificate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "days_left", rename_all = "snake_case")]
pub enum ExpiryStatus {
    /// More than the warning window away
    Valid,
    /// Inside the warning window; whole days left
    ExpiringSoon(i64),
    /// Already past its expiration
    Expired,
}

impl ExpiryStatus {
    /// Short label appended to the expiration date in listings
    #[must_use]
    pub fn annotation(&self) -> Option<String> {
        match self {
            Self::Valid => None,
            Self::ExpiringSoon(days) => Some(format!("({days}d left)")),
            Self::Expired => Some("(EXPIRED)".to_string()),
        }
    }
}

/// Expiry classification policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpiryPolicy {
    /// Certificates with fewer whole days left than this are expiring soon
    pub warning_days: i64,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            warning_days: DEFAULT_EXPIRY_WARNING_DAYS,
        }
    }
}

impl ExpiryPolicy {
    /// Create a policy with a custom warning window
    #[must_use]
    pub const fn new(warning_days: i64) -> Self {
        Self { warning_days }
    }

    /// Classify an expiration instant relative to `now`
    #[must_use]
    pub fn evaluate(&self, expires_at: DateTime<Utc>, now: DateTime<Utc>) -> ExpiryStatus {
        let days_left = days_until(expires_at, now);
        if days_left < 0 {
            ExpiryStatus::Expired
        } else if days_left < self.warning_days {
            ExpiryStatus::ExpiringSoon(days_left)
        } else {
            ExpiryStatus::Valid
        }
    }
}

/// Whole days from `now` until `expires_at`, rounded toward negative infinity.
///
/// Anything already in the past, even by a nanosecond, is day `-1` or less.
#[must_use]
pub fn days_until(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let delta = expires_at - now;
    // num_days truncates toward zero
    let days = delta.num_days();
    if delta < Duration::days(days) {
        days - 1
    } else {
        days
    }
}
