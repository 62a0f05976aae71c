use thiserror::Error;

/// Result type alias for trust-store operations
pub type Result<T> = std::result::Result<T, TrustError>;

/// Errors that can occur while talking to the management plane
#[derive(Error, Debug)]
pub enum TrustError {
    /// Network-level failure (DNS, connect, TLS handshake, reset)
    #[error("transport failure: {0}")]
    Transport(String),

    /// Request timed out
    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    /// Authentication rejected by the manager
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// API returned an error response
    #[error("API error ({code}): {message}")]
    Api {
        /// HTTP status code
        code: u16,
        /// `error_message` from the body, or the raw body
        message: String,
    },

    /// Optimistic-concurrency conflict on a revisioned write
    #[error("stale revision ({code}): {message}")]
    StaleRevision {
        /// HTTP status code, 409 or 412
        code: u16,
        /// Message returned by the manager
        message: String,
    },

    /// Response was not JSON or lacked required fields
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Operator picked an index that doesn't exist
    #[error("invalid selection '{input}': expected an index between 0 and {}", .len.saturating_sub(1))]
    InvalidUserSelection {
        /// Raw operator input
        input: String,
        /// Number of selectable entries
        len: usize,
    },

    /// Node cannot be addressed (no fqdn and no ip_address)
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    /// Operator declined a confirmation or backed out of a selection
    #[error("aborted by operator")]
    AbortedByOperator,

    /// Invalid URL
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl TrustError {
    /// Returns true for network and timeout failures
    #[must_use]
    pub const fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Timeout(_))
    }

    /// Returns true if the operator cancelled the operation
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        matches!(self, Self::AbortedByOperator)
    }

    /// Returns true if the error should lead to a re-prompt
    #[must_use]
    pub const fn is_invalid_selection(&self) -> bool {
        matches!(self, Self::InvalidUserSelection { .. })
    }

    /// Returns the HTTP status code if this is an API error
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Unauthorized(_) => Some(401),
            Self::StaleRevision { code, .. } => Some(*code),
            Self::Api { code, .. } => Some(*code),
            _ => None,
        }
    }
}
