//! Sandbox State
//!
//! Shared state accessible by all sandbox handlers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;

use super::fixtures::Fixtures;

/// Shared sandbox state
#[derive(Clone)]
pub struct SandboxState {
    /// Data served by the list endpoints, fixed at startup
    pub fixtures: Arc<Fixtures>,
    /// Issued access tokens: token → email
    ///
    /// Tokens never expire and the map is never pruned; it grows by one
    /// entry per login for the lifetime of the process.
    pub tokens: Arc<RwLock<HashMap<String, String>>>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl SandboxState {
    pub fn new(fixtures: Fixtures) -> Self {
        Self {
            fixtures: Arc::new(fixtures),
            tokens: Arc::new(RwLock::new(HashMap::new())),
            start_time: Instant::now(),
        }
    }

    /// Issue a fresh token for an email
    pub async fn issue_token(&self, email: &str) -> String {
        let token = format!("sandbox-{}", uuid::Uuid::new_v4().simple());
        self.tokens
            .write()
            .await
            .insert(token.clone(), email.to_string());
        token
    }

    /// Email the token was issued to, if it is known
    pub async fn token_owner(&self, token: &str) -> Option<String> {
        self.tokens.read().await.get(token).cloned()
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Sandbox server configuration
#[derive(Debug, Clone)]
pub struct SandboxConfig {
    pub host: String,
    pub port: u16,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl SandboxConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_tokens_accumulate_per_login() {
        let state = SandboxState::new(Fixtures::sample());

        let first = state.issue_token("ada@example.com").await;
        let second = state.issue_token("ada@example.com").await;

        assert_ne!(first, second);
        assert_eq!(state.token_owner(&first).await.as_deref(), Some("ada@example.com"));
        assert_eq!(state.token_owner(&second).await.as_deref(), Some("ada@example.com"));
        assert!(state.token_owner("sandbox-unknown").await.is_none());
        assert_eq!(state.tokens.read().await.len(), 2);
    }

    #[test]
    fn test_clones_share_fixtures() {
        let state = SandboxState::new(Fixtures::sample());
        let clone = state.clone();

        assert!(Arc::ptr_eq(&state.fixtures, &clone.fixtures));
        assert_eq!(clone.fixtures.models.len(), Fixtures::sample().models.len());
    }

    #[test]
    fn test_config_addr() {
        assert_eq!(SandboxConfig::default().addr(), "127.0.0.1:8000");
        assert_eq!(SandboxConfig::new("0.0.0.0", 9000).addr(), "0.0.0.0:9000");
    }
}
