use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::ChirpData;
use crate::domain::chirp::errors::ChirpError;
use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::ChirpBody;
use crate::domain::chirp::models::ChirpFilter;
use crate::domain::chirp::models::ChirpId;
use crate::domain::chirp::models::SortOrder;
use crate::domain::chirp::ports::ChirpServicePort;
use crate::domain::user::models::UserId;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChirpRequestBody {
    body: String,
}

impl ChirpRequestBody {
    fn try_into_body(self) -> Result<ChirpBody, ChirpError> {
        Ok(ChirpBody::new(self.body)?)
    }
}

/// Query string for chirp listings: `?author_id=<uuid>&sort=asc|desc`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListChirpsQuery {
    author_id: Option<String>,
    sort: Option<String>,
}

fn parse_sort(sort: Option<&str>) -> Result<SortOrder, ApiError> {
    match sort {
        None => Ok(SortOrder::default()),
        Some(sort) => sort
            .parse::<SortOrder>()
            .map_err(|e| ApiError::BadRequest(e.to_string())),
    }
}

fn parse_chirp_id(id: &str) -> Result<ChirpId, ApiError> {
    ChirpId::from_string(id).map_err(|e| ApiError::from(ChirpError::from(e)))
}

fn to_data(chirps: Vec<Chirp>) -> Vec<ChirpData> {
    chirps.iter().map(ChirpData::from).collect()
}

pub async fn create_chirp(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Json(body): Json<ChirpRequestBody>,
) -> Result<ApiSuccess<ChirpData>, ApiError> {
    let body = body.try_into_body()?;

    state
        .chirp_service
        .create_chirp(&caller.user_id, body)
        .await
        .map_err(ApiError::from)
        .map(|ref chirp| ApiSuccess::new(StatusCode::CREATED, chirp.into()))
}

pub async fn list_chirps(
    State(state): State<AppState>,
    Query(query): Query<ListChirpsQuery>,
) -> Result<ApiSuccess<Vec<ChirpData>>, ApiError> {
    let author = query
        .author_id
        .as_deref()
        .map(UserId::from_string)
        .transpose()?;
    let filter = ChirpFilter {
        author,
        sort: parse_sort(query.sort.as_deref())?,
    };

    let chirps = state.chirp_service.list_chirps(filter).await?;

    Ok(ApiSuccess::new(StatusCode::OK, to_data(chirps)))
}

/// Chirps of one author, addressed by path.
pub async fn list_user_chirps(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<ListChirpsQuery>,
) -> Result<ApiSuccess<Vec<ChirpData>>, ApiError> {
    let filter = ChirpFilter {
        author: Some(UserId::from_string(&user_id)?),
        sort: parse_sort(query.sort.as_deref())?,
    };

    let chirps = state.chirp_service.list_chirps(filter).await?;

    Ok(ApiSuccess::new(StatusCode::OK, to_data(chirps)))
}

/// The caller's own chirps.
pub async fn list_my_chirps(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Query(query): Query<ListChirpsQuery>,
) -> Result<ApiSuccess<Vec<ChirpData>>, ApiError> {
    let filter = ChirpFilter {
        author: Some(caller.user_id),
        sort: parse_sort(query.sort.as_deref())?,
    };

    let chirps = state.chirp_service.list_chirps(filter).await?;

    Ok(ApiSuccess::new(StatusCode::OK, to_data(chirps)))
}

pub async fn get_chirp(
    State(state): State<AppState>,
    Path(chirp_id): Path<String>,
) -> Result<ApiSuccess<ChirpData>, ApiError> {
    let chirp_id = parse_chirp_id(&chirp_id)?;

    state
        .chirp_service
        .get_chirp(&chirp_id)
        .await
        .map_err(ApiError::from)
        .map(|ref chirp| ApiSuccess::new(StatusCode::OK, chirp.into()))
}

/// Edit a chirp. Only paid-tier members may edit, and only their own chirps.
pub async fn update_chirp(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(chirp_id): Path<String>,
    Json(body): Json<ChirpRequestBody>,
) -> Result<ApiSuccess<ChirpData>, ApiError> {
    let chirp_id = parse_chirp_id(&chirp_id)?;
    let body = body.try_into_body()?;

    state
        .chirp_service
        .update_chirp(&caller.user_id, &chirp_id, body)
        .await
        .map_err(ApiError::from)
        .map(|ref chirp| ApiSuccess::new(StatusCode::OK, chirp.into()))
}

pub async fn delete_chirp(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthenticatedUser>,
    Path(chirp_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let chirp_id = parse_chirp_id(&chirp_id)?;

    state
        .chirp_service
        .delete_chirp(&caller.user_id, &chirp_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_defaults_to_ascending() {
        assert_eq!(parse_sort(None), Ok(SortOrder::Asc));
        assert_eq!(parse_sort(Some("desc")), Ok(SortOrder::Desc));
        assert!(matches!(parse_sort(Some("sideways")), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_parse_chirp_id_rejects_garbage() {
        assert!(matches!(parse_chirp_id("not-a-uuid"), Err(ApiError::BadRequest(_))));
    }
}
