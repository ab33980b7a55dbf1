use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::session::ports::SessionServicePort;
use crate::inbound::http::router::AppState;

/// Issue a new access token for the refresh token in the `Authorization` header.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiSuccess<RefreshResponseData>, ApiError> {
    let refresh_token = refresh_token_from(&headers)?;

    state
        .session_service
        .refresh_session(refresh_token)
        .await
        .map_err(ApiError::from)
        .map(|token| ApiSuccess::new(StatusCode::OK, RefreshResponseData { token }))
}

/// Revoke the refresh token in the `Authorization` header.
pub async fn revoke(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let refresh_token = refresh_token_from(&headers)?;

    state.session_service.revoke_session(refresh_token).await?;

    Ok(StatusCode::NO_CONTENT)
}

fn refresh_token_from(headers: &HeaderMap) -> Result<&str, ApiError> {
    auth::extract_bearer(headers).map_err(|e| {
        tracing::warn!(error = %e, "Refresh token missing from request");
        ApiError::Unauthorized
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshResponseData {
    pub token: String,
}
