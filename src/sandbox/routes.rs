//! Sandbox route handlers

use axum::{
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use super::error::{SandboxError, SandboxResult};
use super::state::SandboxState;
use crate::domain::ModelSummary;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

/// POST /google-login
pub async fn google_login(
    State(state): State<Arc<SandboxState>>,
    Json(request): Json<LoginRequest>,
) -> SandboxResult<Json<LoginResponse>> {
    let email = request.email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(SandboxError::Validation(format!(
            "invalid email: {:?}",
            request.email
        )));
    }

    let access_token = state.issue_token(email).await;
    tracing::info!(email = %email, "Issued sandbox token");

    Ok(Json(LoginResponse {
        access_token,
        token_type: "bearer",
    }))
}

/// GET /common/all-predictions
pub async fn all_predictions(
    State(state): State<Arc<SandboxState>>,
    headers: HeaderMap,
) -> SandboxResult<Json<Value>> {
    authorize(&state, &headers).await?;

    let fixtures = &state.fixtures;
    Ok(Json(json!({
        "success": true,
        "total_records": fixtures.predictions.len(),
        "data": fixtures.predictions,
    })))
}

/// GET /common/get-all-models-data
///
/// Served as a bare array, unlike the predictions endpoint.
pub async fn all_models(
    State(state): State<Arc<SandboxState>>,
    headers: HeaderMap,
) -> SandboxResult<Json<Vec<ModelSummary>>> {
    authorize(&state, &headers).await?;

    Ok(Json(state.fixtures.models.clone()))
}

/// GET /health
pub async fn health(State(state): State<Arc<SandboxState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "uptime_seconds": state.uptime_seconds(),
    }))
}

async fn authorize(state: &SandboxState, headers: &HeaderMap) -> SandboxResult<String> {
    let token = bearer_token(headers)
        .ok_or_else(|| SandboxError::Unauthorized("missing bearer token".to_string()))?;

    state
        .token_owner(token)
        .await
        .ok_or_else(|| SandboxError::Unauthorized("unknown token".to_string()))
}

/// Extract the token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token_parsing() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(bearer_token(&headers), Some("abc"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer  xyz "));
        assert_eq!(bearer_token(&headers), Some("xyz"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_none());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_none());
    }
}
