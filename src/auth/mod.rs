//! Token Provider
//!
//! Bridges an identity session to a backend bearer token.
//!
//! ## Flow
//!
//! 1. The identity provider hands over an [`Identity`]
//! 2. [`AuthSession::sign_in`] exchanges its email via `POST /google-login`
//! 3. The resulting [`BearerToken`] is published to subscribers
//! 4. [`AuthSession::sign_out`] clears it again
//!
//! A session without a token is "not yet authorized": consumers must not
//! call protected endpoints.

mod session;
mod token;

pub use session::{AuthSession, SignInOutcome};
pub use token::{BearerToken, Identity, TokenExchange};
