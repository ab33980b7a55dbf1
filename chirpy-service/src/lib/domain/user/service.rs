use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::authorization::ensure_owner;
use crate::domain::credentials::hash_password;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::UpdateCredentialsCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Shared credential hasher
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn hash(&self, password: String) -> Result<String, UserError> {
        if password.is_empty() {
            return Err(UserError::EmptyPassword);
        }
        hash_password(Arc::clone(&self.authenticator), password)
            .await
            .map_err(|e| UserError::Password(e.to_string()))
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let hashed_password = self.hash(command.password).await?;

        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: command.email,
            hashed_password,
            is_chirpy_red: false,
            created_at: now,
            updated_at: now,
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(user_id = %created_user.id, "User registered");

        Ok(created_user)
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }

    async fn update_credentials(
        &self,
        actor: &UserId,
        command: UpdateCredentialsCommand,
    ) -> Result<User, UserError> {
        let mut user = self
            .repository
            .find_by_id(actor)
            .await?
            .ok_or(UserError::AccountMissing)?;

        user.hashed_password = self.hash(command.password).await?;
        user.email = command.email;
        user.updated_at = Utc::now();

        self.repository.update(user).await
    }

    async fn delete_user(&self, actor: &UserId, target: &UserId) -> Result<(), UserError> {
        ensure_owner(actor, target)?;

        self.repository.delete(target).await?;
        tracing::info!(user_id = %target, "User deleted");

        Ok(())
    }

    async fn upgrade_membership(&self, id: &UserId) -> Result<User, UserError> {
        let user = self.repository.set_chirpy_red(id, true).await?;
        tracing::info!(user_id = %id, "Membership upgraded");

        Ok(user)
    }
}
