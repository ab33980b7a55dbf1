use thiserror::Error;

use crate::domain::authorization::AuthorizationError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FriendshipStatusError {
    #[error("Unknown friendship status: {0}")]
    Unknown(String),
}

#[derive(Debug, Clone, Error)]
pub enum RelationshipError {
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("No pending friend request from {0}")]
    RequestNotFound(String),

    #[error("Not friends with {0}")]
    FriendshipNotFound(String),

    #[error("A friendship or request already exists with {0}")]
    AlreadyExists(String),

    #[error("Invalid stored relationship: {0}")]
    InvalidStatus(#[from] FriendshipStatusError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
