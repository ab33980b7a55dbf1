use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use super::errors::RelationshipError;
use super::models::Follow;
use super::models::Friendship;
use super::models::FriendshipStatus;
use super::ports::FollowRepository;
use super::ports::FriendshipRepository;
use super::ports::RelationshipServicePort;
use crate::domain::authorization::ensure_distinct_parties;
use crate::domain::authorization::ensure_owner;
use crate::domain::authorization::ensure_party;
use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::Page;
use crate::domain::chirp::ports::ChirpRepository;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// Concrete implementation of RelationshipServicePort.
pub struct RelationshipService<FR, SR, CR, UR>
where
    FR: FollowRepository,
    SR: FriendshipRepository,
    CR: ChirpRepository,
    UR: UserRepository,
{
    follow_repository: Arc<FR>,
    friendship_repository: Arc<SR>,
    chirp_repository: Arc<CR>,
    user_repository: Arc<UR>,
}

impl<FR, SR, CR, UR> RelationshipService<FR, SR, CR, UR>
where
    FR: FollowRepository,
    SR: FriendshipRepository,
    CR: ChirpRepository,
    UR: UserRepository,
{
    /// Create a new relationship service with injected dependencies.
    ///
    /// # Arguments
    /// * `follow_repository` - Follow edge persistence
    /// * `friendship_repository` - Friendship persistence
    /// * `chirp_repository` - Chirp listing for the feed
    /// * `user_repository` - Existence checks for the other party
    pub fn new(
        follow_repository: Arc<FR>,
        friendship_repository: Arc<SR>,
        chirp_repository: Arc<CR>,
        user_repository: Arc<UR>,
    ) -> Self {
        Self {
            follow_repository,
            friendship_repository,
            chirp_repository,
            user_repository,
        }
    }

    async fn ensure_user_exists(&self, id: &UserId) -> Result<(), RelationshipError> {
        self.user_repository
            .find_by_id(id)
            .await
            .map_err(|e| RelationshipError::DatabaseError(e.to_string()))?
            .map(|_| ())
            .ok_or(RelationshipError::UserNotFound(id.to_string()))
    }

    /// Locate the pending request between `actor` and `requester` and check
    /// that the actor is the one allowed to answer it.
    async fn answerable_request(
        &self,
        actor: &UserId,
        requester: &UserId,
    ) -> Result<Friendship, RelationshipError> {
        ensure_distinct_parties(actor, requester)?;

        let request = self
            .friendship_repository
            .find_between(actor, requester)
            .await?
            .filter(|f| f.status == FriendshipStatus::Pending)
            .ok_or(RelationshipError::RequestNotFound(requester.to_string()))?;

        ensure_party(actor, &request.user_id, &request.friend_id)?;
        // Only the addressee answers; a requester cannot accept their own request.
        ensure_owner(actor, &request.friend_id)?;

        Ok(request)
    }
}

#[async_trait]
impl<FR, SR, CR, UR> RelationshipServicePort for RelationshipService<FR, SR, CR, UR>
where
    FR: FollowRepository,
    SR: FriendshipRepository,
    CR: ChirpRepository,
    UR: UserRepository,
{
    async fn follow(&self, actor: &UserId, followee: &UserId) -> Result<Follow, RelationshipError> {
        ensure_distinct_parties(actor, followee)?;
        self.ensure_user_exists(followee).await?;

        let follow = Follow {
            follower_id: *actor,
            followee_id: *followee,
            created_at: Utc::now(),
        };
        self.follow_repository.insert(follow).await
    }

    async fn unfollow(&self, actor: &UserId, followee: &UserId) -> Result<(), RelationshipError> {
        ensure_distinct_parties(actor, followee)?;
        self.follow_repository.delete(actor, followee).await
    }

    async fn followers(&self, user: &UserId) -> Result<Vec<Follow>, RelationshipError> {
        self.follow_repository.followers(user).await
    }

    async fn following(&self, user: &UserId) -> Result<Vec<Follow>, RelationshipError> {
        self.follow_repository.following(user).await
    }

    async fn feed(&self, user: &UserId, page: Page) -> Result<Vec<Chirp>, RelationshipError> {
        let authors: Vec<UserId> = self
            .follow_repository
            .following(user)
            .await?
            .into_iter()
            .map(|f| f.followee_id)
            .collect();

        if authors.is_empty() {
            return Ok(Vec::new());
        }

        self.chirp_repository
            .list_by_authors(&authors, page)
            .await
            .map_err(|e| RelationshipError::DatabaseError(e.to_string()))
    }

    async fn send_friend_request(
        &self,
        actor: &UserId,
        addressee: &UserId,
    ) -> Result<Friendship, RelationshipError> {
        ensure_distinct_parties(actor, addressee)?;
        self.ensure_user_exists(addressee).await?;

        if self
            .friendship_repository
            .find_between(actor, addressee)
            .await?
            .is_some()
        {
            return Err(RelationshipError::AlreadyExists(addressee.to_string()));
        }

        self.friendship_repository
            .insert(Friendship::request(*actor, *addressee, Utc::now()))
            .await
    }

    async fn accept_friend_request(
        &self,
        actor: &UserId,
        requester: &UserId,
    ) -> Result<Friendship, RelationshipError> {
        let request = self.answerable_request(actor, requester).await?;

        self.friendship_repository
            .update_status(
                &request.user_id,
                &request.friend_id,
                FriendshipStatus::Accepted,
                Utc::now(),
            )
            .await
    }

    async fn reject_friend_request(
        &self,
        actor: &UserId,
        requester: &UserId,
    ) -> Result<(), RelationshipError> {
        let request = self.answerable_request(actor, requester).await?;

        match self
            .friendship_repository
            .delete(&request.user_id, &request.friend_id)
            .await?
        {
            0 => Err(RelationshipError::RequestNotFound(requester.to_string())),
            _ => Ok(()),
        }
    }

    async fn remove_friend(&self, actor: &UserId, friend: &UserId) -> Result<(), RelationshipError> {
        ensure_distinct_parties(actor, friend)?;

        let friendship = self
            .friendship_repository
            .find_between(actor, friend)
            .await?
            .filter(|f| f.status == FriendshipStatus::Accepted)
            .ok_or(RelationshipError::FriendshipNotFound(friend.to_string()))?;
        ensure_party(actor, &friendship.user_id, &friendship.friend_id)?;

        match self
            .friendship_repository
            .delete(&friendship.user_id, &friendship.friend_id)
            .await?
        {
            0 => Err(RelationshipError::FriendshipNotFound(friend.to_string())),
            _ => Ok(()),
        }
    }

    async fn friends(&self, user: &UserId) -> Result<Vec<Friendship>, RelationshipError> {
        self.friendship_repository.list_accepted(user).await
    }

    async fn pending_requests(&self, user: &UserId) -> Result<Vec<Friendship>, RelationshipError> {
        self.friendship_repository.list_pending_received(user).await
    }

    async fn sent_requests(&self, user: &UserId) -> Result<Vec<Friendship>, RelationshipError> {
        self.friendship_repository.list_pending_sent(user).await
    }
}
