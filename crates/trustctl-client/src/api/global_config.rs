//! Global configuration endpoints.

use crate::TrustClient;
use trustctl_core::{Result, SecurityGlobalConfig};

const SECURITY_CONFIG_PATH: &str = "/api/v1/global-configs/SecurityGlobalConfig";

/// Global configuration endpoints
pub struct GlobalConfigApi<'a> {
    client: &'a TrustClient,
}

impl<'a> GlobalConfigApi<'a> {
    pub(crate) fn new(client: &'a TrustClient) -> Self {
        Self { client }
    }

    /// Read the global security configuration, including its `_revision`
    pub async fn security(&self) -> Result<SecurityGlobalConfig> {
        self.client.get(SECURITY_CONFIG_PATH).await
    }

    /// Replace the global security configuration.
    ///
    /// The payload's `_revision` must match the current one or the manager
    /// rejects the write with `StaleRevision`.
    pub async fn update_security(&self, config: &SecurityGlobalConfig) -> Result<SecurityGlobalConfig> {
        self.client.put(SECURITY_CONFIG_PATH, config).await
    }
}

#[cfg(test)]
mod tests {
    use crate::{Credentials, TrustClient};
    use serde_json::json;
    use trustctl_core::TrustError;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_stale_write_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/global-configs/SecurityGlobalConfig"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "crl_checking_enabled": true,
                "_revision": 2
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/global-configs/SecurityGlobalConfig"))
            .respond_with(ResponseTemplate::new(412).set_body_json(json!({
                "error_code": 208,
                "error_message": "The object was modified by somebody else"
            })))
            .mount(&server)
            .await;

        let client = TrustClient::new(server.uri(), Credentials::new("a", "b")).unwrap();
        let current = client.global_configs().security().await.unwrap();
        assert_eq!(current.revision, Some(2));

        let err = client
            .global_configs()
            .update_security(&current.with_crl_checking(false))
            .await
            .unwrap_err();
        match err {
            TrustError::StaleRevision { message, .. } => {
                assert_eq!(message, "The object was modified by somebody else");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_update_returns_new_revision() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/api/v1/global-configs/SecurityGlobalConfig"))
            .and(body_partial_json(json!({"_revision": 5, "crl_checking_enabled": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "crl_checking_enabled": false,
                "_revision": 6
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = TrustClient::new(server.uri(), Credentials::new("a", "b")).unwrap();
        let current = trustctl_core::SecurityGlobalConfig {
            revision: Some(5),
            ..Default::default()
        };
        let updated = client
            .global_configs()
            .update_security(&current.with_crl_checking(false))
            .await
            .unwrap();
        assert_eq!(updated.revision, Some(6));
        assert_eq!(updated.crl_checking_enabled, Some(false));
    }
}
