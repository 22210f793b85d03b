//! Prediction Backend
//!
//! Client side of the external prediction backend.
//!
//! ## Endpoints consumed
//!
//! - `POST /google-login` - email for bearer token
//! - `GET /common/all-predictions` - wrapped list of predictions
//! - `GET /common/get-all-models-data` - bare list of model summaries
//!
//! The [`Transport`] trait is the seam pollers fetch through, so they can
//! be driven by something other than a live HTTP client.

mod client;
mod endpoint;
mod envelope;
mod error;

pub use client::{BackendClient, ClientConfig};
pub use endpoint::{Endpoint, MODELS_PATH, PREDICTIONS_PATH};
pub use envelope::{Envelope, Extracted};
pub use error::{BackendError, BackendResult};

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::BearerToken;

/// Issues authorized GET requests and returns the parsed JSON body
#[async_trait]
pub trait Transport: Send + Sync {
    /// One GET with `Authorization: Bearer <token>`
    ///
    /// Non-2xx responses, network failures and non-JSON bodies are errors.
    async fn get_json(&self, path: &str, token: &BearerToken) -> BackendResult<Value>;
}
