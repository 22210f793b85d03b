//! Sandbox backend
//!
//! A local stand-in for the prediction backend, built with Axum. It speaks
//! the same wire shapes the dashboard consumes so the client can be
//! exercised end to end without the real service.
//!
//! # Endpoints
//!
//! - `POST /google-login` - Exchange `{email}` for `{access_token}`
//! - `GET /common/all-predictions` - Wrapped: `{success, total_records, data}`
//! - `GET /common/get-all-models-data` - Bare array of model summaries
//! - `GET /health` - Liveness
//!
//! The list endpoints require `Authorization: Bearer <token>` with a token
//! previously issued by `/google-login`.
//!
//! # Example
//!
//! ```rust,ignore
//! use predictdash::sandbox::{serve, Fixtures, SandboxConfig, SandboxState};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let state = SandboxState::new(Fixtures::sample());
//!     serve(state, &SandboxConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod fixtures;
pub mod routes;
pub mod state;

pub use error::{SandboxError, SandboxResult};
pub use fixtures::Fixtures;
pub use state::{SandboxConfig, SandboxState};

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::{MODELS_PATH, PREDICTIONS_PATH};

/// Build the sandbox router with all routes and middleware
pub fn build_router(state: SandboxState) -> Router {
    let shared_state = Arc::new(state);

    Router::new()
        .route("/google-login", post(routes::google_login))
        .route(PREDICTIONS_PATH, get(routes::all_predictions))
        .route(MODELS_PATH, get(routes::all_models))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the sandbox server
pub async fn serve(state: SandboxState, config: &SandboxConfig) -> Result<(), SandboxError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Sandbox backend listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| SandboxError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Sandbox backend shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        build_router(SandboxState::new(Fixtures::sample()))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login(app: &Router, email: &str) -> axum::response::Response {
        app.clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/google-login")
                    .header("Content-Type", "application/json")
                    .body(Body::from(format!(r#"{{"email": "{}"}}"#, email)))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn get_with_token(app: &Router, uri: &str, token: Option<&str>) -> axum::response::Response {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        app.clone()
            .oneshot(builder.body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_test_app();
        let response = get_with_token(&app, "/health", None).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_login_issues_token() {
        let app = create_test_app();
        let response = login(&app, "ada@example.com").await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["access_token"].as_str().unwrap().starts_with("sandbox-"));
    }

    #[tokio::test]
    async fn test_login_rejects_empty_email() {
        let app = create_test_app();
        let response = login(&app, "").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert!(body["request_id"].is_string());
    }

    #[tokio::test]
    async fn test_login_invalid_json() {
        let app = create_test_app();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/google-login")
                    .header("Content-Type", "application/json")
                    .body(Body::from("not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_predictions_require_token() {
        let app = create_test_app();

        let response = get_with_token(&app, PREDICTIONS_PATH, None).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = get_with_token(&app, PREDICTIONS_PATH, Some("forged")).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_predictions_are_wrapped() {
        let app = create_test_app();
        let body = body_json(login(&app, "ada@example.com").await).await;
        let token = body["access_token"].as_str().unwrap().to_string();

        let response = get_with_token(&app, PREDICTIONS_PATH, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let expected = Fixtures::sample().predictions.len();
        assert_eq!(body["success"], true);
        assert_eq!(body["total_records"], expected);
        assert_eq!(body["data"].as_array().unwrap().len(), expected);
    }

    #[tokio::test]
    async fn test_models_are_bare() {
        let app = create_test_app();
        let body = body_json(login(&app, "ada@example.com").await).await;
        let token = body["access_token"].as_str().unwrap().to_string();

        let response = get_with_token(&app, MODELS_PATH, Some(&token)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        let models = body.as_array().unwrap();
        assert_eq!(models.len(), Fixtures::sample().models.len());
        assert!(models[0]["avg_output"].is_number());
    }
}
