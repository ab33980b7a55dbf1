use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;

use crate::domain::relationship::errors::FriendshipStatusError;
use crate::domain::user::models::UserId;

/// One-directional follow edge: `follower_id` sees `followee_id`'s chirps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Follow {
    pub follower_id: UserId,
    pub followee_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Friendship record, directed from requester (`user_id`) to addressee
/// (`friend_id`).
///
/// Stored once per pair; accepting flips the status in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Friendship {
    pub user_id: UserId,
    pub friend_id: UserId,
    pub status: FriendshipStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Friendship {
    pub fn request(requester: UserId, addressee: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id: requester,
            friend_id: addressee,
            status: FriendshipStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// The party that is not `user`.
    pub fn other_party(&self, user: &UserId) -> UserId {
        if &self.user_id == user {
            self.friend_id
        } else {
            self.user_id
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FriendshipStatus {
    Pending,
    Accepted,
}

impl FriendshipStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendshipStatus::Pending => "pending",
            FriendshipStatus::Accepted => "accepted",
        }
    }
}

impl FromStr for FriendshipStatus {
    type Err = FriendshipStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FriendshipStatus::Pending),
            "accepted" => Ok(FriendshipStatus::Accepted),
            other => Err(FriendshipStatusError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for FriendshipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
