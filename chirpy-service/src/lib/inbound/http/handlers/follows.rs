use axum::extract::Path;
use axum::extract::Query;
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
use super::ChirpData;
use crate::domain::chirp::models::Page;
use crate::domain::relationship::models::Follow;
use crate::domain::relationship::ports::RelationshipServicePort;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FollowRequestBody {
    user_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowData {
    pub follower_id: String,
    pub followee_id: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Follow> for FollowData {
    fn from(follow: &Follow) -> Self {
        Self {
            follower_id: follow.follower_id.to_string(),
            followee_id: follow.followee_id.to_string(),
            created_at: follow.created_at,
        }
    }
}

pub async fn follow(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<FollowRequestBody>,
) -> Result<ApiSuccess<FollowData>, ApiError> {
    let followee = UserId::from_string(&body.user_id)?;

    state
        .relationship_service
        .follow(&caller.user_id, &followee)
        .await
        .map_err(ApiError::from)
        .map(|ref follow| ApiSuccess::new(StatusCode::CREATED, follow.into()))
}

pub async fn unfollow(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let followee = UserId::from_string(&user_id)?;

    state
        .relationship_service
        .unfollow(&caller.user_id, &followee)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn followers(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<FollowData>>, ApiError> {
    let follows = state.relationship_service.followers(&caller.user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        follows.iter().map(FollowData::from).collect(),
    ))
}

pub async fn following(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
) -> Result<ApiSuccess<Vec<FollowData>>, ApiError> {
    let follows = state.relationship_service.following(&caller.user_id).await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        follows.iter().map(FollowData::from).collect(),
    ))
}

/// Chirps from followed users, newest first: `?limit=&offset=`.
pub async fn feed(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Query(query): Query<FeedQuery>,
) -> Result<ApiSuccess<Vec<ChirpData>>, ApiError> {
    let page = Page::new(query.limit, query.offset);
    let chirps = state
        .relationship_service
        .feed(&caller.user_id, page)
        .await?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        chirps.iter().map(ChirpData::from).collect(),
    ))
}
