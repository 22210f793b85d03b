//! Auth Session
//!
//! Explicit auth context handed to every component that calls protected
//! backend endpoints. Created at session start, filled in by `sign_in`,
//! invalidated by `sign_out`.
//!
//! The bearer token is published through a `watch` channel so pollers can
//! stay idle until it arrives and go idle again after sign-out.

use std::sync::RwLock;
use tokio::sync::watch;

use super::token::{BearerToken, Identity, TokenExchange};

/// Outcome of a sign-in attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignInOutcome {
    /// Backend issued a token
    Authorized,
    /// Identity accepted, but the token exchange failed
    Unauthorized,
}

/// Session-scoped auth context
pub struct AuthSession {
    identity: RwLock<Option<Identity>>,
    token_tx: watch::Sender<Option<BearerToken>>,
}

impl AuthSession {
    /// Start an empty session
    pub fn new() -> Self {
        let (token_tx, _) = watch::channel(None);
        Self {
            identity: RwLock::new(None),
            token_tx,
        }
    }

    /// Start a session that already holds a backend token
    pub fn with_token(token: BearerToken) -> Self {
        let session = Self::new();
        session.token_tx.send_replace(Some(token));
        session
    }

    /// Sign in and exchange the identity's email for a backend token
    ///
    /// Never fails: when the exchange fails the session proceeds without a
    /// token and protected calls stay disabled.
    pub async fn sign_in(&self, identity: Identity, exchange: &dyn TokenExchange) -> SignInOutcome {
        let email = identity.email.clone();
        self.set_identity(Some(identity));

        match exchange.exchange(&email).await {
            Ok(token) if !token.is_empty() => {
                tracing::info!(email = %email, "Backend token issued");
                self.token_tx.send_replace(Some(token));
                SignInOutcome::Authorized
            }
            Ok(_) => {
                tracing::warn!(email = %email, "Backend issued an empty token, continuing without one");
                self.token_tx.send_replace(None);
                SignInOutcome::Unauthorized
            }
            Err(e) => {
                tracing::warn!(email = %email, error = %e, "Token exchange failed, continuing without backend token");
                self.token_tx.send_replace(None);
                SignInOutcome::Unauthorized
            }
        }
    }

    /// Invalidate the session
    pub fn sign_out(&self) {
        self.set_identity(None);
        self.token_tx.send_replace(None);
        tracing::info!("Signed out");
    }

    /// Current identity, if signed in
    pub fn identity(&self) -> Option<Identity> {
        match self.identity.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Current backend token
    pub fn token(&self) -> Option<BearerToken> {
        self.token_tx.borrow().clone()
    }

    /// Whether protected endpoints may be called
    pub fn is_authorized(&self) -> bool {
        self.token_tx.borrow().is_some()
    }

    /// Watch token changes
    pub fn subscribe(&self) -> watch::Receiver<Option<BearerToken>> {
        self.token_tx.subscribe()
    }

    fn set_identity(&self, identity: Option<Identity>) {
        match self.identity.write() {
            Ok(mut guard) => *guard = identity,
            Err(poisoned) => *poisoned.into_inner() = identity,
        }
    }
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::BackendError;
    use async_trait::async_trait;

    struct FixedExchange(Result<&'static str, u16>);

    #[async_trait]
    impl TokenExchange for FixedExchange {
        async fn exchange(&self, _email: &str) -> Result<BearerToken, BackendError> {
            match self.0 {
                Ok(token) => Ok(BearerToken::new(token)),
                Err(status) => Err(BackendError::Status {
                    status,
                    message: "denied".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_sign_in_publishes_token() {
        let session = AuthSession::new();
        let mut rx = session.subscribe();
        assert!(!session.is_authorized());

        let outcome = session
            .sign_in(Identity::new("ada@example.com"), &FixedExchange(Ok("tok-1")))
            .await;

        assert_eq!(outcome, SignInOutcome::Authorized);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref().map(|t| t.expose()), Some("tok-1"));
        assert_eq!(session.identity().unwrap().email, "ada@example.com");
    }

    #[tokio::test]
    async fn test_failed_exchange_does_not_block_sign_in() {
        let session = AuthSession::new();

        let outcome = session
            .sign_in(Identity::new("ada@example.com"), &FixedExchange(Err(500)))
            .await;

        assert_eq!(outcome, SignInOutcome::Unauthorized);
        assert!(session.identity().is_some());
        assert!(session.token().is_none());
    }

    #[tokio::test]
    async fn test_empty_token_is_unauthorized() {
        let session = AuthSession::new();
        let outcome = session
            .sign_in(Identity::new("ada@example.com"), &FixedExchange(Ok("")))
            .await;
        assert_eq!(outcome, SignInOutcome::Unauthorized);
        assert!(!session.is_authorized());
    }

    #[tokio::test]
    async fn test_sign_out_invalidates() {
        let session = AuthSession::with_token(BearerToken::new("tok"));
        let mut rx = session.subscribe();
        assert!(session.is_authorized());

        session.sign_out();

        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
        assert!(session.identity().is_none());
        assert!(!session.is_authorized());
    }
}
