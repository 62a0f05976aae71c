use serde_json::Value;
use tracing::{info, warn};
use trustctl_client::TrustClient;
use trustctl_core::{RawResponse, ValidationOutcome};

/// Server-side validation of a single certificate
pub struct ValidationService<'a> {
    client: &'a TrustClient,
}

impl<'a> ValidationService<'a> {
    #[must_use]
    pub const fn new(client: &'a TrustClient) -> Self {
        Self { client }
    }

    /// Ask the manager to validate `certificate_id`. One attempt; a failed
    /// call is reported as `Invalid` with the error as detail.
    pub async fn validate(&self, certificate_id: &str) -> ValidationOutcome {
        let outcome = match self.client.certificates().validate(certificate_id).await {
            Ok(raw) => interpret(&raw),
            Err(e) => ValidationOutcome::Invalid(e.to_string()),
        };

        match &outcome {
            ValidationOutcome::Valid => info!(certificate_id, "certificate validated"),
            ValidationOutcome::Invalid(detail) => {
                warn!(certificate_id, detail = %detail, "certificate failed validation");
            }
        }
        outcome
    }
}

fn interpret(raw: &RawResponse) -> ValidationOutcome {
    let status = raw
        .as_json()
        .and_then(|v| v.get("status"))
        .and_then(Value::as_str);

    if status == Some("OK") {
        ValidationOutcome::Valid
    } else {
        ValidationOutcome::Invalid(raw.to_string())
    }
}
