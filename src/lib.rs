//! # Predictdash
//!
//! Data layer for an ML prediction dashboard: signs in against a prediction
//! backend, polls its model and prediction endpoints, and turns the results
//! into per-dataset leaderboards and a prediction history.
//!
//! ## Features
//!
//! - **Explicit auth context**: one [`AuthSession`] owns the bearer token
//! - **Stale-while-error polling**: failed polls keep the last good data
//! - **Out-of-order safe**: responses older than the last applied one are dropped
//! - **Stable ranking**: models grouped by dataset, ranked by average output
//! - **Sandbox backend**: a local Axum server speaking the same wire shapes
//!
//! ## Modules
//!
//! - [`domain`]: Prediction and model summary records
//! - [`auth`]: Bearer tokens and the sign-in session
//! - [`backend`]: HTTP client, endpoints and response envelopes
//! - [`poller`]: Interval polling with `{data, loading, error}` state
//! - [`aggregate`]: Grouping, ranking and leaderboards
//! - [`display`]: Dataset-specific formatting and terminal tables
//! - [`dashboard`]: Both pollers wired to one session
//! - [`sandbox`]: Local stand-in backend
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use predictdash::{AuthSession, BackendClient, ClientConfig, Dashboard, Identity};
//! use predictdash::dashboard::DashboardEndpoints;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(BackendClient::new(ClientConfig::new("http://localhost:8000"))?);
//!     let session = Arc::new(AuthSession::new());
//!     session.sign_in(Identity::new("ada@example.com"), &*client).await;
//!
//!     let dashboard = Dashboard::new(client, session, DashboardEndpoints::default());
//!     dashboard.refresh_once().await;
//!
//!     for board in dashboard.leaderboard().datasets {
//!         println!("{}: {} models", board.dataset, board.entries.len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod auth;
pub mod backend;
pub mod config;
pub mod dashboard;
pub mod display;
pub mod domain;
pub mod logging;
pub mod poller;
pub mod sandbox;

// Re-export top-level types for convenience
pub use domain::{Categorized, ModelStatus, ModelSummary, PredictionRecord, Ranked, Record};

pub use auth::{AuthSession, BearerToken, Identity, SignInOutcome, TokenExchange};

pub use backend::{
    BackendClient, BackendError, BackendResult, ClientConfig, Endpoint, Envelope, Extracted,
    Transport,
};

pub use poller::{FetchState, PollHandle, PollingFetcher};

pub use aggregate::{group_and_rank, group_by_dataset, rank_by_metric, Grouped, Leaderboard};

pub use display::{format_output, Badge, FormattedOutput, OutputFormat};

pub use dashboard::{Dashboard, DashboardHandle, DashboardSummary};

pub use config::{Config, ConfigError, LoggingConfig};
