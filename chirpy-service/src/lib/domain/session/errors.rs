use thiserror::Error;

/// Errors raised while issuing, refreshing or revoking sessions.
///
/// `InvalidCredentials`, `Unauthorized` and `NotFound` are all rendered as
/// the same unauthorized response; the distinction only reaches the logs.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized")]
    Unauthorized,

    /// No active refresh token matches (absent, revoked or expired).
    #[error("Refresh token not found")]
    NotFound,

    #[error("Refresh token already exists")]
    Conflict,

    /// The owning account does not exist.
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Token issuance failed: {0}")]
    TokenIssuance(String),

    #[error("Password verification failed: {0}")]
    Password(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}
