use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::domain::model::{Principal, Role};
use crate::domain::ports::{AuthClient, AuthError};

/// Identity delegate backed by `POST {base_url}/auth/validate`.
///
/// Three outcomes are kept distinct: the service vouching for the token, the
/// service rejecting it, and the service being unreachable. Only the second
/// is a security decision.
pub struct HttpAuthClient {
    client: reqwest::Client,
    validate_url: String,
}

#[derive(Serialize)]
struct ValidateRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct ValidateResponse {
    valid: bool,
    payload: Option<ValidatePayload>,
}

#[derive(Deserialize)]
struct ValidatePayload {
    uid: Uuid,
    role: String,
}

impl HttpAuthClient {
    pub fn new(cfg: &AuthConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))?;
        Ok(Self {
            client,
            validate_url: format!("{}/auth/validate", cfg.base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl AuthClient for HttpAuthClient {
    async fn authenticate(&self, bearer_token: &str) -> Result<Principal, AuthError> {
        let response = self
            .client
            .post(&self.validate_url)
            .json(&ValidateRequest {
                token: bearer_token,
            })
            .send()
            .await
            .map_err(|e| AuthError::ServiceUnavailable(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            return Err(AuthError::Unauthorized(format!(
                "auth service returned {status}"
            )));
        }
        if !status.is_success() {
            return Err(AuthError::ServiceUnavailable(format!(
                "auth service returned {status}"
            )));
        }

        let body: ValidateResponse = response
            .json()
            .await
            .map_err(|e| AuthError::ServiceUnavailable(format!("malformed auth response: {e}")))?;

        if !body.valid {
            return Err(AuthError::Unauthorized("token rejected".to_owned()));
        }

        let payload = body
            .payload
            .ok_or_else(|| AuthError::Unauthorized("token payload missing".to_owned()))?;

        // Closed role set: a role string this service does not know is an
        // authentication failure, not a silent pass.
        let role = Role::try_from(payload.role.as_str()).map_err(AuthError::Unauthorized)?;

        Ok(Principal {
            user_id: payload.uid,
            role,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;

    fn client_for(server: &MockServer) -> HttpAuthClient {
        HttpAuthClient::new(&AuthConfig {
            base_url: server.base_url(),
            timeout_secs: 2,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn valid_token_yields_principal() {
        let server = MockServer::start_async().await;
        let uid = Uuid::new_v4();
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/auth/validate")
                    .json_body(json!({"token": "good-token"}));
                then.status(200)
                    .json_body(json!({"valid": true, "payload": {"uid": uid, "role": "vendor"}}));
            })
            .await;

        let principal = client_for(&server).authenticate("good-token").await.unwrap();
        mock.assert_async().await;
        assert_eq!(principal.user_id, uid);
        assert_eq!(principal.role, Role::Vendor);
    }

    #[tokio::test]
    async fn rejected_token_is_unauthorized() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/validate");
                then.status(200).json_body(json!({"valid": false}));
            })
            .await;

        let err = client_for(&server)
            .authenticate("bad-token")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn unknown_role_is_unauthorized() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/validate");
                then.status(200).json_body(
                    json!({"valid": true, "payload": {"uid": Uuid::new_v4(), "role": "superuser"}}),
                );
            })
            .await;

        let err = client_for(&server).authenticate("token").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn upstream_error_is_service_unavailable_not_unauthorized() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/auth/validate");
                then.status(500);
            })
            .await;

        let err = client_for(&server).authenticate("token").await.unwrap_err();
        assert!(matches!(err, AuthError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_service_unavailable() {
        // Nothing listens on this port.
        let client = HttpAuthClient::new(&AuthConfig {
            base_url: "http://127.0.0.1:1".to_owned(),
            timeout_secs: 1,
        })
        .unwrap();

        let err = client.authenticate("token").await.unwrap_err();
        assert!(matches!(err, AuthError::ServiceUnavailable(_)));
    }
}
