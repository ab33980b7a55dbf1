use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::relationship::models::Friendship;
use crate::domain::relationship::ports::RelationshipServicePort;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FriendRequestBody {
    user_id: String,
}

/// A friendship or pending request; `requester_id` sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FriendshipData {
    pub requester_id: String,
    pub addressee_id: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Friendship> for FriendshipData {
    fn from(friendship: &Friendship) -> Self {
        Self {
            requester_id: friendship.user_id.to_string(),
            addressee_id: friendship.friend_id.to_string(),
            status: friendship.status.to_string(),
            created_at: friendship.created_at,
            updated_at: friendship.updated_at,
        }
    }
}

fn to_data(friendships: Vec<Friendship>) -> Vec<FriendshipData> {
    friendships.iter().map(FriendshipData::from).collect()
}

pub async fn send_request(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<FriendRequestBody>,
) -> Result<ApiSuccess<FriendshipData>, ApiError> {
    let addressee = UserId::from_string(&body.user_id)?;

    state
        .relationship_service
        .send_friend_request(&caller.user_id, &addressee)
        .await
        .map_err(ApiError::from)
        .map(|ref friendship| ApiSuccess::new(StatusCode::CREATED, friendship.into()))
}

/// Accept the pending request `user_id` sent to the caller.
pub async fn accept_request(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> Result<ApiSuccess<FriendshipData>, ApiError> {
    let requester = UserId::from_string(&user_id)?;

    state
        .relationship_service
        .accept_friend_request(&caller.user_id, &requester)
        .await
        .map_err(ApiError::from)
        .map(|ref friendship| ApiSuccess::new(StatusCode::OK, friendship.into()))
}

pub async fn reject_request(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let requester = UserId::from_string(&user_id)?;

    state
        .relationship_service
        .reject_friend_request(&caller.user_id, &requester)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove_friend(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let friend = UserId::from_string(&user_id)?;

    state
        .relationship_service
        .remove_friend(&caller.user_id, &friend)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_friends(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<FriendshipData>>, ApiError> {
    let friendships = state.relationship_service.friends(&caller.user_id).await?;
    Ok(ApiSuccess::new(StatusCode::OK, to_data(friendships)))
}

/// Requests waiting for the caller's answer.
pub async fn list_received_requests(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<FriendshipData>>, ApiError> {
    let requests = state
        .relationship_service
        .pending_requests(&caller.user_id)
        .await?;
    Ok(ApiSuccess::new(StatusCode::OK, to_data(requests)))
}

pub async fn list_sent_requests(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<FriendshipData>>, ApiError> {
    let requests = state
        .relationship_service
        .sent_requests(&caller.user_id)
        .await?;
    Ok(ApiSuccess::new(StatusCode::OK, to_data(requests)))
}
