use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::errors::ChirpError;
use super::models::Chirp;
use super::models::ChirpBody;
use super::models::ChirpFilter;
use super::models::ChirpId;
use super::ports::ChirpRepository;
use super::ports::ChirpServicePort;
use crate::domain::authorization::ensure_elevated_tier;
use crate::domain::authorization::ensure_owner;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Concrete implementation of ChirpServicePort.
///
/// Editing is a paid-tier feature, so the service also reads accounts.
pub struct ChirpService<CR, UR>
where
    CR: ChirpRepository,
    UR: UserRepository,
{
    chirp_repository: Arc<CR>,
    user_repository: Arc<UR>,
}

impl<CR, UR> ChirpService<CR, UR>
where
    CR: ChirpRepository,
    UR: UserRepository,
{
    /// Create a new chirp service with injected dependencies.
    ///
    /// # Arguments
    /// * `chirp_repository` - Chirp persistence implementation
    /// * `user_repository` - Account lookup for tier checks
    pub fn new(chirp_repository: Arc<CR>, user_repository: Arc<UR>) -> Self {
        Self {
            chirp_repository,
            user_repository,
        }
    }

    async fn find_chirp(&self, id: &ChirpId) -> Result<Chirp, ChirpError> {
        self.chirp_repository
            .find_by_id(id)
            .await?
            .ok_or(ChirpError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl<CR, UR> ChirpServicePort for ChirpService<CR, UR>
where
    CR: ChirpRepository,
    UR: UserRepository,
{
    async fn create_chirp(&self, author: &UserId, body: ChirpBody) -> Result<Chirp, ChirpError> {
        let now = Utc::now();
        let chirp = Chirp {
            id: ChirpId::new(),
            body,
            user_id: *author,
            created_at: now,
            updated_at: now,
        };

        self.chirp_repository.create(chirp).await
    }

    async fn list_chirps(&self, filter: ChirpFilter) -> Result<Vec<Chirp>, ChirpError> {
        self.chirp_repository.list(filter).await
    }

    async fn get_chirp(&self, id: &ChirpId) -> Result<Chirp, ChirpError> {
        self.find_chirp(id).await
    }

    async fn update_chirp(
        &self,
        actor: &UserId,
        id: &ChirpId,
        body: ChirpBody,
    ) -> Result<Chirp, ChirpError> {
        let account = self
            .user_repository
            .find_by_id(actor)
            .await
            .map_err(|e| ChirpError::DatabaseError(e.to_string()))?
            .ok_or(ChirpError::AccountMissing)?;
        ensure_elevated_tier(&account)?;

        let mut chirp = self.find_chirp(id).await?;
        ensure_owner(actor, &chirp.user_id)?;

        chirp.body = body;
        chirp.updated_at = Utc::now();

        self.chirp_repository.update(chirp).await
    }

    async fn delete_chirp(&self, actor: &UserId, id: &ChirpId) -> Result<(), ChirpError> {
        let chirp = self.find_chirp(id).await?;
        ensure_owner(actor, &chirp.user_id)?;

        self.chirp_repository.delete(id).await
    }
}
