use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::authorization::AuthorizationError;
use crate::domain::chirp::errors::ChirpError;
use crate::domain::chirp::models::Chirp;
use crate::domain::relationship::errors::RelationshipError;
use crate::domain::session::errors::SessionError;
use crate::domain::user::errors::UserError;
use crate::domain::user::errors::UserIdError;
use crate::domain::user::models::User;

pub mod chirps;
pub mod create_user;
pub mod delete_user;
pub mod follows;
pub mod friends;
pub mod get_user;
pub mod health;
pub mod login;
pub mod polka_webhook;
pub mod tokens;
pub mod update_user;

const UNAUTHORIZED_MESSAGE: &str = "Unauthorized";
const FORBIDDEN_MESSAGE: &str = "Forbidden";
const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

/// Every failure a handler can report.
///
/// `Unauthorized` and `Forbidden` carry no detail: all authentication
/// failures share one body, and so do all authorization failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized,
    Forbidden,
}

impl ApiError {
    /// Log the underlying failure and hide it from the client.
    fn internal(err: impl std::fmt::Display) -> Self {
        tracing::error!(error = %err, "Request failed with an internal error");
        ApiError::InternalServerError(INTERNAL_MESSAGE.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE.to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE.to_string()),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<AuthorizationError> for ApiError {
    fn from(err: AuthorizationError) -> Self {
        match err {
            AuthorizationError::Forbidden => ApiError::Forbidden,
            AuthorizationError::SelfReference => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl From<UserIdError> for ApiError {
    fn from(err: UserIdError) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::InvalidUserId(_) => ApiError::BadRequest(err.to_string()),
            UserError::InvalidEmail(_) | UserError::EmptyPassword => {
                ApiError::UnprocessableEntity(err.to_string())
            }
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::EmailAlreadyExists(_) => ApiError::Conflict(err.to_string()),
            UserError::AccountMissing => ApiError::Unauthorized,
            UserError::Authorization(e) => e.into(),
            UserError::Password(_) | UserError::DatabaseError(_) => ApiError::internal(err),
        }
    }
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidCredentials
            | SessionError::Unauthorized
            | SessionError::NotFound
            | SessionError::UnknownUser(_) => {
                tracing::debug!(reason = %err, "Session request rejected");
                ApiError::Unauthorized
            }
            SessionError::Conflict
            | SessionError::TokenIssuance(_)
            | SessionError::Password(_)
            | SessionError::DatabaseError(_) => ApiError::internal(err),
        }
    }
}

impl From<ChirpError> for ApiError {
    fn from(err: ChirpError) -> Self {
        match err {
            ChirpError::InvalidChirpId(_) => ApiError::BadRequest(err.to_string()),
            ChirpError::InvalidBody(_) => ApiError::UnprocessableEntity(err.to_string()),
            ChirpError::NotFound(_) => ApiError::NotFound(err.to_string()),
            ChirpError::AccountMissing => ApiError::Unauthorized,
            ChirpError::Authorization(e) => e.into(),
            ChirpError::DatabaseError(_) => ApiError::internal(err),
        }
    }
}

impl From<RelationshipError> for ApiError {
    fn from(err: RelationshipError) -> Self {
        match err {
            RelationshipError::Authorization(e) => e.into(),
            RelationshipError::UserNotFound(_)
            | RelationshipError::RequestNotFound(_)
            | RelationshipError::FriendshipNotFound(_) => ApiError::NotFound(err.to_string()),
            RelationshipError::AlreadyExists(_) => ApiError::Conflict(err.to_string()),
            RelationshipError::InvalidStatus(_) | RelationshipError::DatabaseError(_) => {
                ApiError::internal(err)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Public view of an account. The password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserData {
    pub id: String,
    pub email: String,
    pub is_chirpy_red: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserData {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.as_str().to_string(),
            is_chirpy_red: user.is_chirpy_red,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChirpData {
    pub id: String,
    pub body: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Chirp> for ChirpData {
    fn from(chirp: &Chirp) -> Self {
        Self {
            id: chirp.id.to_string(),
            body: chirp.body.as_str().to_string(),
            user_id: chirp.user_id.to_string(),
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_failures_collapse_to_forbidden() {
        assert_eq!(
            ApiError::from(ChirpError::Authorization(AuthorizationError::Forbidden)),
            ApiError::Forbidden
        );
        assert_eq!(
            ApiError::from(UserError::Authorization(AuthorizationError::Forbidden)),
            ApiError::Forbidden
        );
    }

    #[test]
    fn test_self_reference_is_bad_request() {
        let err = ApiError::from(RelationshipError::Authorization(
            AuthorizationError::SelfReference,
        ));
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_session_failures_collapse_to_unauthorized() {
        for err in [
            SessionError::InvalidCredentials,
            SessionError::Unauthorized,
            SessionError::NotFound,
            SessionError::UnknownUser("x".to_string()),
        ] {
            assert_eq!(ApiError::from(err), ApiError::Unauthorized);
        }
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err = ApiError::from(UserError::DatabaseError("connection refused".to_string()));
        assert_eq!(
            err,
            ApiError::InternalServerError(INTERNAL_MESSAGE.to_string())
        );
    }

    #[test]
    fn test_missing_account_is_unauthorized() {
        assert_eq!(ApiError::from(UserError::AccountMissing), ApiError::Unauthorized);
        assert_eq!(ApiError::from(ChirpError::AccountMissing), ApiError::Unauthorized);
    }
}
