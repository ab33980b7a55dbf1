use std::sync::Arc;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::session::errors::SessionError;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::models::RefreshTokenState;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::user::models::UserId;

/// Session store adapter.
///
/// The one component that reads or writes refresh token state. Absent,
/// revoked and expired tokens all resolve to the same `NotFound`; which of
/// the three it was is only logged.
pub struct SessionStore<RR>
where
    RR: RefreshTokenRepository,
{
    repository: Arc<RR>,
}

impl<RR> SessionStore<RR>
where
    RR: RefreshTokenRepository,
{
    pub fn new(repository: Arc<RR>) -> Self {
        Self { repository }
    }

    /// Persist a new active refresh token.
    ///
    /// # Errors
    /// * `Conflict` - Token string already stored
    /// * `UnknownUser` - Owner does not exist
    /// * `DatabaseError` - Database operation failed
    pub async fn create_refresh_token(
        &self,
        token: String,
        user_id: UserId,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, SessionError> {
        let record = RefreshToken::new(token, user_id, Utc::now(), expires_at);
        self.repository.insert(record).await
    }

    /// Resolve a live refresh token to the user that owns it.
    ///
    /// # Errors
    /// * `NotFound` - Token absent, revoked or expired
    /// * `DatabaseError` - Database operation failed
    pub async fn resolve_owner(&self, token: &str) -> Result<UserId, SessionError> {
        let Some(record) = self.repository.find_by_token(token).await? else {
            tracing::debug!(reason = "absent", "Refresh token rejected");
            return Err(SessionError::NotFound);
        };

        match record.state_at(Utc::now()) {
            RefreshTokenState::Active => Ok(record.user_id),
            RefreshTokenState::Revoked => {
                tracing::debug!(user_id = %record.user_id, reason = "revoked", "Refresh token rejected");
                Err(SessionError::NotFound)
            }
            RefreshTokenState::Expired => {
                tracing::debug!(user_id = %record.user_id, reason = "expired", "Refresh token rejected");
                Err(SessionError::NotFound)
            }
        }
    }

    /// Revoke an active refresh token.
    ///
    /// # Errors
    /// * `NotFound` - No active token matches, so a second revoke fails
    /// * `DatabaseError` - Database operation failed
    pub async fn revoke(&self, token: &str) -> Result<(), SessionError> {
        match self.repository.mark_revoked(token, Utc::now()).await? {
            0 => {
                tracing::debug!("No active refresh token to revoke");
                Err(SessionError::NotFound)
            }
            _ => Ok(()),
        }
    }
}
