use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserServicePort;
use crate::inbound::http::router::AppState;

/// The only event that changes anything; all others are acknowledged and ignored.
pub const UPGRADE_EVENT: &str = "user.upgraded";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookRequestBody {
    event: String,
    data: WebhookData,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WebhookData {
    user_id: String,
}

/// Payment provider callback, authenticated with `Authorization: ApiKey <key>`.
pub async fn polka_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<WebhookRequestBody>,
) -> Result<StatusCode, ApiError> {
    let key = auth::extract_api_key(&headers).map_err(|e| {
        tracing::warn!(error = %e, "Webhook called without an API key");
        ApiError::Unauthorized
    })?;
    if key != state.membership_api_key.as_ref() {
        tracing::warn!("Webhook called with a wrong API key");
        return Err(ApiError::Unauthorized);
    }

    if body.event != UPGRADE_EVENT {
        tracing::debug!(event = %body.event, "Ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = UserId::from_string(&body.data.user_id)?;
    state.user_service.upgrade_membership(&user_id).await?;
    tracing::info!(user_id = %user_id, "Membership upgraded");

    Ok(StatusCode::NO_CONTENT)
}
