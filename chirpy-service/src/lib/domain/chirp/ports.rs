use async_trait::async_trait;

use crate::domain::chirp::errors::ChirpError;
use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::ChirpBody;
use crate::domain::chirp::models::ChirpFilter;
use crate::domain::chirp::models::ChirpId;
use crate::domain::chirp::models::Page;
use crate::domain::user::models::UserId;

/// Port for chirp domain service operations.
#[async_trait]
pub trait ChirpServicePort: Send + Sync + 'static {
    /// Post a chirp as `author`.
    ///
    /// # Errors
    /// * `AccountMissing` - Author account no longer exists
    /// * `DatabaseError` - Database operation failed
    async fn create_chirp(&self, author: &UserId, body: ChirpBody) -> Result<Chirp, ChirpError>;

    /// List chirps, optionally restricted to one author, ordered by creation time.
    async fn list_chirps(&self, filter: ChirpFilter) -> Result<Vec<Chirp>, ChirpError>;

    /// # Errors
    /// * `NotFound` - Chirp does not exist
    async fn get_chirp(&self, id: &ChirpId) -> Result<Chirp, ChirpError>;

    /// Edit a chirp. Requires the paid tier and ownership of the chirp.
    ///
    /// # Errors
    /// * `AccountMissing` - Actor account no longer exists
    /// * `Authorization` - Actor lacks the tier or does not own the chirp
    /// * `NotFound` - Chirp does not exist
    /// * `DatabaseError` - Database operation failed
    async fn update_chirp(
        &self,
        actor: &UserId,
        id: &ChirpId,
        body: ChirpBody,
    ) -> Result<Chirp, ChirpError>;

    /// Delete a chirp owned by the actor.
    ///
    /// # Errors
    /// * `NotFound` - Chirp does not exist
    /// * `Authorization` - Actor does not own the chirp
    /// * `DatabaseError` - Database operation failed
    async fn delete_chirp(&self, actor: &UserId, id: &ChirpId) -> Result<(), ChirpError>;
}

/// Persistence operations for chirps.
#[async_trait]
pub trait ChirpRepository: Send + Sync + 'static {
    /// # Errors
    /// * `AccountMissing` - Author does not exist
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, chirp: Chirp) -> Result<Chirp, ChirpError>;

    async fn find_by_id(&self, id: &ChirpId) -> Result<Option<Chirp>, ChirpError>;

    async fn list(&self, filter: ChirpFilter) -> Result<Vec<Chirp>, ChirpError>;

    /// Chirps by any of `authors`, newest first.
    async fn list_by_authors(&self, authors: &[UserId], page: Page) -> Result<Vec<Chirp>, ChirpError>;

    /// # Errors
    /// * `NotFound` - Chirp does not exist
    async fn update(&self, chirp: Chirp) -> Result<Chirp, ChirpError>;

    /// # Errors
    /// * `NotFound` - Chirp does not exist
    async fn delete(&self, id: &ChirpId) -> Result<(), ChirpError>;
}
