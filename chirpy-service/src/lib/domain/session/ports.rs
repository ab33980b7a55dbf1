use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::LoginResult;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::models::SessionTokens;
use crate::domain::user::models::UserId;

/// Port for session lifecycle operations.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Verify credentials and start a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `Password` - Stored hash is unreadable
    /// * `TokenIssuance` - Signing or entropy failure
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<LoginResult, SessionError>;

    /// Start a session for an already authenticated user.
    ///
    /// # Errors
    /// * `UnknownUser` - The account does not exist
    /// * `TokenIssuance` - Signing or entropy failure
    /// * `DatabaseError` - Database operation failed
    async fn issue_session(&self, user_id: &UserId) -> Result<SessionTokens, SessionError>;

    /// Exchange a live refresh token for a new access token.
    ///
    /// # Errors
    /// * `Unauthorized` - Token absent, revoked or expired
    /// * `TokenIssuance` - Signing failure
    /// * `DatabaseError` - Database operation failed
    async fn refresh_session(&self, refresh_token: &str) -> Result<String, SessionError>;

    /// Revoke a live refresh token.
    ///
    /// # Errors
    /// * `NotFound` - No active token matches, including one already revoked
    /// * `DatabaseError` - Database operation failed
    async fn revoke_session(&self, refresh_token: &str) -> Result<(), SessionError>;
}

/// Persistence operations for refresh tokens.
///
/// Only the session store calls these.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// # Errors
    /// * `Conflict` - Token string already stored
    /// * `UnknownUser` - Owner does not exist
    /// * `DatabaseError` - Database operation failed
    async fn insert(&self, token: RefreshToken) -> Result<RefreshToken, SessionError>;

    /// Fetch a token record regardless of its state.
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, SessionError>;

    /// Set `revoked_at` on the record only if it is still active at `now`.
    ///
    /// # Returns
    /// Number of records changed (0 or 1)
    async fn mark_revoked(&self, token: &str, now: DateTime<Utc>) -> Result<u64, SessionError>;
}
