use thiserror::Error;

use crate::domain::authorization::AuthorizationError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChirpIdError {
    #[error("Invalid UUID format: {0}")]
    InvalidFormat(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChirpBodyError {
    #[error("Chirp body cannot be empty")]
    Empty,

    #[error("Chirp is too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SortOrderError {
    #[error("Unknown sort order: {0} (expected asc or desc)")]
    Unknown(String),
}

#[derive(Debug, Clone, Error)]
pub enum ChirpError {
    #[error("Invalid chirp ID: {0}")]
    InvalidChirpId(#[from] ChirpIdError),

    #[error("Invalid chirp body: {0}")]
    InvalidBody(#[from] ChirpBodyError),

    #[error("Chirp not found: {0}")]
    NotFound(String),

    /// The acting account no longer exists.
    #[error("Author account no longer exists")]
    AccountMissing,

    #[error(transparent)]
    Authorization(#[from] AuthorizationError),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
