use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Persisted refresh token record.
///
/// Revocation is a tombstone: `revoked_at` is set once and the row is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshToken {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

/// Lifecycle state of a stored refresh token at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTokenState {
    Active,
    Revoked,
    Expired,
}

impl RefreshToken {
    pub fn new(
        token: String,
        user_id: UserId,
        now: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            token,
            user_id,
            created_at: now,
            updated_at: now,
            expires_at,
            revoked_at: None,
        }
    }

    /// Revocation wins over expiry when both apply.
    pub fn state_at(&self, now: DateTime<Utc>) -> RefreshTokenState {
        if self.revoked_at.is_some() {
            RefreshTokenState::Revoked
        } else if now >= self.expires_at {
            RefreshTokenState::Expired
        } else {
            RefreshTokenState::Active
        }
    }
}

/// Token lifetimes applied by the session service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionPolicy {
    access_token_ttl: Duration,
    max_access_token_ttl: Duration,
    refresh_token_ttl: Duration,
}

impl SessionPolicy {
    pub fn new(
        access_token_ttl: Duration,
        max_access_token_ttl: Duration,
        refresh_token_ttl: Duration,
    ) -> Self {
        Self {
            access_token_ttl,
            max_access_token_ttl,
            refresh_token_ttl,
        }
    }

    /// Resolve the access token lifetime for a login.
    ///
    /// A requested lifetime is honoured only when it is positive and within
    /// the maximum; anything else falls back to the default.
    pub fn access_lifetime(&self, requested_seconds: Option<i64>) -> Duration {
        // Compared as seconds so absurd requests never reach Duration arithmetic.
        match requested_seconds {
            Some(seconds) if seconds > 0 && seconds <= self.max_access_token_ttl.num_seconds() => {
                Duration::seconds(seconds)
            }
            _ => self.access_token_ttl,
        }
    }

    pub fn access_token_ttl(&self) -> Duration {
        self.access_token_ttl
    }

    pub fn refresh_token_ttl(&self) -> Duration {
        self.refresh_token_ttl
    }
}

impl Default for SessionPolicy {
    fn default() -> Self {
        Self::new(Duration::hours(1), Duration::hours(1), Duration::days(60))
    }
}

/// Credentials submitted to the login endpoint.
#[derive(Debug)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
    pub expires_in_seconds: Option<i64>,
}

/// Token pair handed to a client when a session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTokens {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: User,
    pub tokens: SessionTokens,
}
