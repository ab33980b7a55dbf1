use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::Page;
use crate::domain::relationship::errors::RelationshipError;
use crate::domain::relationship::models::Follow;
use crate::domain::relationship::models::Friendship;
use crate::domain::relationship::models::FriendshipStatus;
use crate::domain::user::models::UserId;

/// Port for follow and friendship operations.
///
/// Every operation naming a second user rejects the actor naming itself
/// before touching storage.
#[async_trait]
pub trait RelationshipServicePort: Send + Sync + 'static {
    /// Follow another user. Following twice is not an error.
    ///
    /// # Errors
    /// * `Authorization` - `SelfReference` when following yourself
    /// * `UserNotFound` - Followee does not exist
    async fn follow(&self, actor: &UserId, followee: &UserId) -> Result<Follow, RelationshipError>;

    /// Stop following a user. Unfollowing someone not followed is not an error.
    async fn unfollow(&self, actor: &UserId, followee: &UserId) -> Result<(), RelationshipError>;

    /// Users following `user`.
    async fn followers(&self, user: &UserId) -> Result<Vec<Follow>, RelationshipError>;

    /// Users `user` follows.
    async fn following(&self, user: &UserId) -> Result<Vec<Follow>, RelationshipError>;

    /// Chirps by followed users, newest first.
    async fn feed(&self, user: &UserId, page: Page) -> Result<Vec<Chirp>, RelationshipError>;

    /// # Errors
    /// * `Authorization` - `SelfReference` when addressing yourself
    /// * `UserNotFound` - Addressee does not exist
    /// * `AlreadyExists` - A request or friendship exists in either direction
    async fn send_friend_request(
        &self,
        actor: &UserId,
        addressee: &UserId,
    ) -> Result<Friendship, RelationshipError>;

    /// Accept a pending request sent to the actor by `requester`.
    ///
    /// # Errors
    /// * `Authorization` - `SelfReference`, or `Forbidden` when the actor is not the addressee
    /// * `RequestNotFound` - No pending request from `requester`
    async fn accept_friend_request(
        &self,
        actor: &UserId,
        requester: &UserId,
    ) -> Result<Friendship, RelationshipError>;

    /// Decline a pending request; the request is removed.
    ///
    /// # Errors
    /// Same as [`RelationshipServicePort::accept_friend_request`].
    async fn reject_friend_request(
        &self,
        actor: &UserId,
        requester: &UserId,
    ) -> Result<(), RelationshipError>;

    /// End an accepted friendship from either side.
    ///
    /// # Errors
    /// * `Authorization` - `SelfReference` when naming yourself
    /// * `FriendshipNotFound` - The two users are not friends
    async fn remove_friend(&self, actor: &UserId, friend: &UserId) -> Result<(), RelationshipError>;

    async fn friends(&self, user: &UserId) -> Result<Vec<Friendship>, RelationshipError>;

    /// Pending requests addressed to `user`.
    async fn pending_requests(&self, user: &UserId) -> Result<Vec<Friendship>, RelationshipError>;

    /// Pending requests sent by `user`.
    async fn sent_requests(&self, user: &UserId) -> Result<Vec<Friendship>, RelationshipError>;
}

/// Persistence operations for follow edges.
#[async_trait]
pub trait FollowRepository: Send + Sync + 'static {
    /// Store the edge, keeping the existing one if already present.
    ///
    /// # Errors
    /// * `UserNotFound` - Either user does not exist
    async fn insert(&self, follow: Follow) -> Result<Follow, RelationshipError>;

    async fn delete(&self, follower: &UserId, followee: &UserId) -> Result<(), RelationshipError>;

    async fn followers(&self, followee: &UserId) -> Result<Vec<Follow>, RelationshipError>;

    async fn following(&self, follower: &UserId) -> Result<Vec<Follow>, RelationshipError>;
}

/// Persistence operations for friendships.
#[async_trait]
pub trait FriendshipRepository: Send + Sync + 'static {
    /// # Errors
    /// * `AlreadyExists` - The ordered pair is already stored
    /// * `UserNotFound` - Either user does not exist
    async fn insert(&self, friendship: Friendship) -> Result<Friendship, RelationshipError>;

    /// The record linking `a` and `b`, in either direction.
    async fn find_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Friendship>, RelationshipError>;

    /// # Errors
    /// * `RequestNotFound` - No record from `requester` to `addressee`
    async fn update_status(
        &self,
        requester: &UserId,
        addressee: &UserId,
        status: FriendshipStatus,
        now: DateTime<Utc>,
    ) -> Result<Friendship, RelationshipError>;

    /// # Returns
    /// Number of records removed (0 or 1)
    async fn delete(&self, requester: &UserId, addressee: &UserId) -> Result<u64, RelationshipError>;

    /// Accepted friendships where `user` is either party.
    async fn list_accepted(&self, user: &UserId) -> Result<Vec<Friendship>, RelationshipError>;

    async fn list_pending_received(
        &self,
        addressee: &UserId,
    ) -> Result<Vec<Friendship>, RelationshipError>;

    async fn list_pending_sent(
        &self,
        requester: &UserId,
    ) -> Result<Vec<Friendship>, RelationshipError>;
}
