//! Prediction Backend REST Client
//!
//! HTTP client for the prediction backend's REST API.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{BackendError, BackendResult};
use super::Transport;
use crate::auth::{BearerToken, TokenExchange};

/// Prediction backend REST client
pub struct BackendClient {
    client: Client,
    config: ClientConfig,
}

/// Configuration for the backend client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL for the backend (e.g., "http://localhost:8000")
    pub base_url: String,
    /// Path of the email-for-token exchange
    pub login_path: String,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            login_path: "/google-login".to_string(),
            request_timeout_ms: 5000,
        }
    }
}

impl ClientConfig {
    /// Create config for a base URL with default paths
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }
}

impl BackendClient {
    /// Create a new backend client with the given configuration
    pub fn new(config: ClientConfig) -> BackendResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .user_agent(concat!("predictdash/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Resolve an endpoint path against the base URL
    pub fn url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{}{}", base, path)
        } else {
            format!("{}/{}", base, path)
        }
    }

    /// Exchange an email for a backend bearer token
    pub async fn login(&self, email: &str) -> BackendResult<BearerToken> {
        let url = self.url(&self.config.login_path);

        let response = self
            .client
            .post(&url)
            .json(&LoginRequest { email })
            .send()
            .await
            .map_err(BackendError::from_send)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: LoginResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        match body.access_token {
            Some(token) if !token.trim().is_empty() => Ok(BearerToken::new(token)),
            _ => Err(BackendError::MissingToken),
        }
    }

    /// GET a bearer-protected resource and parse it as JSON
    pub async fn get_json(&self, path: &str, token: &BearerToken) -> BackendResult<Value> {
        let url = self.url(path);

        let response = self
            .client
            .get(&url)
            .bearer_auth(token.expose())
            .send()
            .await
            .map_err(BackendError::from_send)?;

        let status = response.status();
        let text = response.text().await.map_err(BackendError::from_send)?;

        if !status.is_success() {
            return Err(BackendError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl TokenExchange for BackendClient {
    async fn exchange(&self, email: &str) -> Result<BearerToken, BackendError> {
        self.login(email).await
    }
}

#[async_trait]
impl Transport for BackendClient {
    async fn get_json(&self, path: &str, token: &BearerToken) -> BackendResult<Value> {
        BackendClient::get_json(self, path, token).await
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    access_token: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::{build_router, Fixtures, SandboxState};

    /// Serve the sandbox on an ephemeral port and return its base URL
    async fn spawn_sandbox() -> String {
        let state = SandboxState::new(Fixtures::sample());
        let router = build_router(state);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.login_path, "/google-login");
    }

    #[test]
    fn test_url_joining() {
        let client = BackendClient::new(ClientConfig::new("http://api.local/")).unwrap();
        assert_eq!(
            client.url("/common/all-predictions"),
            "http://api.local/common/all-predictions"
        );
        assert_eq!(client.url("health"), "http://api.local/health");
    }

    #[tokio::test]
    async fn test_login_and_fetch_round_trip() {
        let base_url = spawn_sandbox().await;
        let client = BackendClient::new(ClientConfig::new(base_url)).unwrap();

        let token = client.login("ada@example.com").await.unwrap();
        assert!(!token.is_empty());

        let body = client
            .get_json("/common/all-predictions", &token)
            .await
            .unwrap();
        assert_eq!(body["success"], serde_json::json!(true));
        assert!(body["data"].is_array());

        let models = client
            .get_json("/common/get-all-models-data", &token)
            .await
            .unwrap();
        assert!(models.is_array());
    }

    #[tokio::test]
    async fn test_unknown_token_is_rejected() {
        let base_url = spawn_sandbox().await;
        let client = BackendClient::new(ClientConfig::new(base_url)).unwrap();

        let err = client
            .get_json("/common/all-predictions", &BearerToken::new("forged"))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_login_rejects_empty_email() {
        let base_url = spawn_sandbox().await;
        let client = BackendClient::new(ClientConfig::new(base_url)).unwrap();

        let err = client.login("").await.unwrap_err();
        assert!(matches!(err, BackendError::Status { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Nothing listens on port 9 (discard) on loopback in test environments
        let client = BackendClient::new(ClientConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_ms: 500,
            ..Default::default()
        })
        .unwrap();

        let err = client.login("ada@example.com").await.unwrap_err();
        assert!(matches!(
            err,
            BackendError::Unavailable | BackendError::Timeout | BackendError::Request(_)
        ));
    }
}
