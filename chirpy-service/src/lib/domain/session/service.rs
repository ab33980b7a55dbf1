use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Duration;
use chrono::Utc;

use crate::domain::credentials::verify_password;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::LoginCommand;
use crate::domain::session::models::LoginResult;
use crate::domain::session::models::SessionPolicy;
use crate::domain::session::models::SessionTokens;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::session::store::SessionStore;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Concrete implementation of SessionServicePort.
///
/// Combines the credential check, token issuance and the session store into
/// the login, refresh and revoke flows.
pub struct SessionService<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    user_repository: Arc<UR>,
    store: SessionStore<RR>,
    authenticator: Arc<Authenticator>,
    policy: SessionPolicy,
}

impl<UR, RR> SessionService<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    /// Create a new session service with injected dependencies.
    ///
    /// # Arguments
    /// * `user_repository` - Account lookup for login
    /// * `token_repository` - Refresh token persistence
    /// * `authenticator` - Shared hasher and token codec
    /// * `policy` - Token lifetimes
    pub fn new(
        user_repository: Arc<UR>,
        token_repository: Arc<RR>,
        authenticator: Arc<Authenticator>,
        policy: SessionPolicy,
    ) -> Self {
        Self {
            user_repository,
            store: SessionStore::new(token_repository),
            authenticator,
            policy,
        }
    }

    async fn start_session(
        &self,
        user_id: &UserId,
        access_lifetime: Duration,
    ) -> Result<SessionTokens, SessionError> {
        let refresh_token = self
            .authenticator
            .generate_refresh_token()
            .map_err(|e| SessionError::TokenIssuance(e.to_string()))?;

        let expires_at = Utc::now() + self.policy.refresh_token_ttl();
        self.store
            .create_refresh_token(refresh_token.clone(), *user_id, expires_at)
            .await?;

        let access_token = self.issue_access_token(user_id, access_lifetime)?;

        Ok(SessionTokens {
            access_token,
            refresh_token,
        })
    }

    fn issue_access_token(
        &self,
        user_id: &UserId,
        lifetime: Duration,
    ) -> Result<String, SessionError> {
        self.authenticator
            .issue_access_token(user_id, lifetime)
            .map_err(|e| SessionError::TokenIssuance(e.to_string()))
    }
}

#[async_trait]
impl<UR, RR> SessionServicePort for SessionService<UR, RR>
where
    UR: UserRepository,
    RR: RefreshTokenRepository,
{
    async fn login(&self, command: LoginCommand) -> Result<LoginResult, SessionError> {
        let user = self
            .user_repository
            .find_by_email(&command.email)
            .await
            .map_err(|e| SessionError::DatabaseError(e.to_string()))?;

        let Some(user) = user else {
            tracing::debug!("Login rejected: unknown email");
            return Err(SessionError::InvalidCredentials);
        };

        verify_password(
            Arc::clone(&self.authenticator),
            command.password,
            user.hashed_password.clone(),
        )
        .await
        .map_err(|e| match e {
            AuthenticationError::InvalidCredentials => {
                tracing::debug!(user_id = %user.id, "Login rejected: password mismatch");
                SessionError::InvalidCredentials
            }
            other => SessionError::Password(other.to_string()),
        })?;

        let lifetime = self.policy.access_lifetime(command.expires_in_seconds);
        let tokens = self.start_session(&user.id, lifetime).await?;
        tracing::info!(user_id = %user.id, "Session started");

        Ok(LoginResult { user, tokens })
    }

    async fn issue_session(&self, user_id: &UserId) -> Result<SessionTokens, SessionError> {
        self.start_session(user_id, self.policy.access_token_ttl())
            .await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<String, SessionError> {
        let user_id = self
            .store
            .resolve_owner(refresh_token)
            .await
            .map_err(|e| match e {
                SessionError::NotFound => SessionError::Unauthorized,
                other => other,
            })?;

        self.issue_access_token(&user_id, self.policy.access_token_ttl())
    }

    async fn revoke_session(&self, refresh_token: &str) -> Result<(), SessionError> {
        self.store.revoke(refresh_token).await?;
        tracing::info!("Refresh token revoked");

        Ok(())
    }
}
