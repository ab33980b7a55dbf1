// In-memory backend used when no database URL is configured, and by the tests.
// Each table is a HashMap behind a parking_lot RwLock; a write is visible to
// every read that starts after it. Foreign keys and ON DELETE CASCADE are
// emulated so behaviour matches the Postgres schema. Locks are always taken
// users first, so a delete and a dependent insert are serialized.

use std::collections::HashMap;
use std::collections::HashSet;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use parking_lot::RwLock;

use crate::domain::chirp::errors::ChirpError;
use crate::domain::chirp::models::Chirp;
use crate::domain::chirp::models::ChirpFilter;
use crate::domain::chirp::models::ChirpId;
use crate::domain::chirp::models::Page;
use crate::domain::chirp::models::SortOrder;
use crate::domain::chirp::ports::ChirpRepository;
use crate::domain::relationship::errors::RelationshipError;
use crate::domain::relationship::models::Follow;
use crate::domain::relationship::models::Friendship;
use crate::domain::relationship::models::FriendshipStatus;
use crate::domain::relationship::ports::FollowRepository;
use crate::domain::relationship::ports::FriendshipRepository;
use crate::domain::session::errors::SessionError;
use crate::domain::session::models::RefreshToken;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;

/// All data is stored in memory and lost on restart.
#[derive(Default)]
pub struct InMemoryStore {
    users: RwLock<HashMap<UserId, User>>,
    refresh_tokens: RwLock<HashMap<String, RefreshToken>>,
    chirps: RwLock<HashMap<ChirpId, Chirp>>,
    // Keyed by (follower, followee)
    follows: RwLock<HashMap<(UserId, UserId), Follow>>,
    // Keyed by (requester, addressee)
    friendships: RwLock<HashMap<(UserId, UserId), Friendship>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn paginate<T>(items: Vec<T>, page: Page) -> Vec<T> {
        let offset = usize::try_from(page.offset).unwrap_or(0);
        let limit = usize::try_from(page.limit).unwrap_or(0);
        items.into_iter().skip(offset).take(limit).collect()
    }

    fn friendships_matching(&self, predicate: impl Fn(&Friendship) -> bool) -> Vec<Friendship> {
        let mut matching: Vec<Friendship> = self
            .friendships
            .read()
            .values()
            .filter(|f| predicate(f))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        matching
    }
}

// ============================================
// Users
// ============================================

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write();
        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.users.read().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write();
        if users
            .values()
            .any(|u| u.email == user.email && u.id != user.id)
        {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }

        let stored = users
            .get_mut(&user.id)
            .ok_or(UserError::NotFound(user.id.to_string()))?;
        stored.email = user.email.clone();
        stored.hashed_password = user.hashed_password.clone();
        stored.updated_at = user.updated_at;

        Ok(stored.clone())
    }

    async fn set_chirpy_red(&self, id: &UserId, is_chirpy_red: bool) -> Result<User, UserError> {
        let mut users = self.users.write();
        let stored = users
            .get_mut(id)
            .ok_or(UserError::NotFound(id.to_string()))?;
        stored.is_chirpy_red = is_chirpy_red;
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserError> {
        // Held through the cascade so no dependent row can slip in behind it.
        let mut users = self.users.write();
        if users.remove(id).is_none() {
            return Err(UserError::NotFound(id.to_string()));
        }

        self.refresh_tokens.write().retain(|_, t| &t.user_id != id);
        self.chirps.write().retain(|_, c| &c.user_id != id);
        self.follows
            .write()
            .retain(|(follower, followee), _| follower != id && followee != id);
        self.friendships
            .write()
            .retain(|(requester, addressee), _| requester != id && addressee != id);

        Ok(())
    }
}

// ============================================
// Refresh tokens
// ============================================

#[async_trait]
impl RefreshTokenRepository for InMemoryStore {
    async fn insert(&self, token: RefreshToken) -> Result<RefreshToken, SessionError> {
        let users = self.users.read();
        if !users.contains_key(&token.user_id) {
            return Err(SessionError::UnknownUser(token.user_id.to_string()));
        }

        let mut tokens = self.refresh_tokens.write();
        if tokens.contains_key(&token.token) {
            return Err(SessionError::Conflict);
        }
        tokens.insert(token.token.clone(), token.clone());

        Ok(token)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, SessionError> {
        Ok(self.refresh_tokens.read().get(token).cloned())
    }

    async fn mark_revoked(&self, token: &str, now: DateTime<Utc>) -> Result<u64, SessionError> {
        // Check and write under one lock so two revokes cannot both succeed.
        let mut tokens = self.refresh_tokens.write();
        match tokens.get_mut(token) {
            Some(record) if record.revoked_at.is_none() && record.expires_at > now => {
                record.revoked_at = Some(now);
                record.updated_at = now;
                Ok(1)
            }
            _ => Ok(0),
        }
    }
}

// ============================================
// Chirps
// ============================================

#[async_trait]
impl ChirpRepository for InMemoryStore {
    async fn create(&self, chirp: Chirp) -> Result<Chirp, ChirpError> {
        let users = self.users.read();
        if !users.contains_key(&chirp.user_id) {
            return Err(ChirpError::AccountMissing);
        }
        self.chirps.write().insert(chirp.id, chirp.clone());
        Ok(chirp)
    }

    async fn find_by_id(&self, id: &ChirpId) -> Result<Option<Chirp>, ChirpError> {
        Ok(self.chirps.read().get(id).cloned())
    }

    async fn list(&self, filter: ChirpFilter) -> Result<Vec<Chirp>, ChirpError> {
        let mut chirps: Vec<Chirp> = self
            .chirps
            .read()
            .values()
            .filter(|c| filter.author.map_or(true, |author| c.user_id == author))
            .cloned()
            .collect();

        chirps.sort_by(|a, b| match filter.sort {
            SortOrder::Asc => a.created_at.cmp(&b.created_at),
            SortOrder::Desc => b.created_at.cmp(&a.created_at),
        });

        Ok(chirps)
    }

    async fn list_by_authors(&self, authors: &[UserId], page: Page) -> Result<Vec<Chirp>, ChirpError> {
        let authors: HashSet<&UserId> = authors.iter().collect();

        let mut chirps: Vec<Chirp> = self
            .chirps
            .read()
            .values()
            .filter(|c| authors.contains(&c.user_id))
            .cloned()
            .collect();
        chirps.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(Self::paginate(chirps, page))
    }

    async fn update(&self, chirp: Chirp) -> Result<Chirp, ChirpError> {
        let mut chirps = self.chirps.write();
        let stored = chirps
            .get_mut(&chirp.id)
            .ok_or(ChirpError::NotFound(chirp.id.to_string()))?;
        stored.body = chirp.body.clone();
        stored.updated_at = chirp.updated_at;

        Ok(stored.clone())
    }

    async fn delete(&self, id: &ChirpId) -> Result<(), ChirpError> {
        self.chirps
            .write()
            .remove(id)
            .map(|_| ())
            .ok_or(ChirpError::NotFound(id.to_string()))
    }
}

// ============================================
// Follows
// ============================================

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn insert(&self, follow: Follow) -> Result<Follow, RelationshipError> {
        let users = self.users.read();
        for id in [&follow.follower_id, &follow.followee_id] {
            if !users.contains_key(id) {
                return Err(RelationshipError::UserNotFound(id.to_string()));
            }
        }

        let stored = self
            .follows
            .write()
            .entry((follow.follower_id, follow.followee_id))
            .or_insert(follow)
            .clone();

        Ok(stored)
    }

    async fn delete(&self, follower: &UserId, followee: &UserId) -> Result<(), RelationshipError> {
        self.follows.write().remove(&(*follower, *followee));
        Ok(())
    }

    async fn followers(&self, followee: &UserId) -> Result<Vec<Follow>, RelationshipError> {
        let mut follows: Vec<Follow> = self
            .follows
            .read()
            .values()
            .filter(|f| &f.followee_id == followee)
            .cloned()
            .collect();
        follows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(follows)
    }

    async fn following(&self, follower: &UserId) -> Result<Vec<Follow>, RelationshipError> {
        let mut follows: Vec<Follow> = self
            .follows
            .read()
            .values()
            .filter(|f| &f.follower_id == follower)
            .cloned()
            .collect();
        follows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(follows)
    }
}

// ============================================
// Friendships
// ============================================

#[async_trait]
impl FriendshipRepository for InMemoryStore {
    async fn insert(&self, friendship: Friendship) -> Result<Friendship, RelationshipError> {
        let users = self.users.read();
        for id in [&friendship.user_id, &friendship.friend_id] {
            if !users.contains_key(id) {
                return Err(RelationshipError::UserNotFound(id.to_string()));
            }
        }

        // One row per unordered pair, whichever side asked first.
        let mut friendships = self.friendships.write();
        let key = (friendship.user_id, friendship.friend_id);
        let reverse = (friendship.friend_id, friendship.user_id);
        if friendships.contains_key(&key) || friendships.contains_key(&reverse) {
            return Err(RelationshipError::AlreadyExists(
                friendship.friend_id.to_string(),
            ));
        }
        friendships.insert(key, friendship.clone());

        Ok(friendship)
    }

    async fn find_between(
        &self,
        a: &UserId,
        b: &UserId,
    ) -> Result<Option<Friendship>, RelationshipError> {
        let friendships = self.friendships.read();
        Ok(friendships
            .get(&(*a, *b))
            .or_else(|| friendships.get(&(*b, *a)))
            .cloned())
    }

    async fn update_status(
        &self,
        requester: &UserId,
        addressee: &UserId,
        status: FriendshipStatus,
        now: DateTime<Utc>,
    ) -> Result<Friendship, RelationshipError> {
        let mut friendships = self.friendships.write();
        let stored = friendships
            .get_mut(&(*requester, *addressee))
            .ok_or(RelationshipError::RequestNotFound(requester.to_string()))?;
        stored.status = status;
        stored.updated_at = now;

        Ok(stored.clone())
    }

    async fn delete(&self, requester: &UserId, addressee: &UserId) -> Result<u64, RelationshipError> {
        Ok(self
            .friendships
            .write()
            .remove(&(*requester, *addressee))
            .map_or(0, |_| 1))
    }

    async fn list_accepted(&self, user: &UserId) -> Result<Vec<Friendship>, RelationshipError> {
        Ok(self.friendships_matching(|f| {
            f.status == FriendshipStatus::Accepted && (&f.user_id == user || &f.friend_id == user)
        }))
    }

    async fn list_pending_received(
        &self,
        addressee: &UserId,
    ) -> Result<Vec<Friendship>, RelationshipError> {
        Ok(self.friendships_matching(|f| {
            f.status == FriendshipStatus::Pending && &f.friend_id == addressee
        }))
    }

    async fn list_pending_sent(
        &self,
        requester: &UserId,
    ) -> Result<Vec<Friendship>, RelationshipError> {
        Ok(self.friendships_matching(|f| {
            f.status == FriendshipStatus::Pending && &f.user_id == requester
        }))
    }
}
