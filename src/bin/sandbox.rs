//! Predictdash Sandbox Backend
//!
//! Run with: cargo run --bin predictdash-sandbox
//!
//! # Configuration
//!
//! Read from the predictdash config file (see `predictdash config`), with
//! environment overrides:
//! - `PREDICTDASH_SANDBOX_HOST`: Host to bind to (default: 127.0.0.1)
//! - `PREDICTDASH_SANDBOX_PORT`: Port to listen on (default: 8000)
//! - `PREDICTDASH_LOG_LEVEL`, `PREDICTDASH_LOG_FORMAT`
//! - `RUST_LOG`: Log filter, overrides the level
//!
//! The first argument, when given, is a JSON fixtures file.

use predictdash::config::Config;
use predictdash::sandbox::{serve, Fixtures, SandboxState};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_default();
    predictdash::logging::init(&config.logging);

    tracing::info!("Starting predictdash sandbox v{}", env!("CARGO_PKG_VERSION"));

    let fixtures_path = std::env::args()
        .nth(1)
        .or_else(|| config.sandbox.fixtures.clone())
        .map(PathBuf::from);

    let fixtures = match fixtures_path {
        Some(path) => {
            tracing::info!("Loading fixtures from {:?}", path);
            Fixtures::load(&path)?
        }
        None => Fixtures::sample(),
    };

    tracing::info!(
        predictions = fixtures.predictions.len(),
        models = fixtures.models.len(),
        "Fixtures ready"
    );

    let state = SandboxState::new(fixtures);
    serve(state, &config.sandbox_config()).await?;

    tracing::info!("Sandbox stopped");
    Ok(())
}
