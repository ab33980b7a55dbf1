//! Argon2 work moved off the async runtime.
//!
//! Hashing is deliberately slow, so both directions run on tokio's blocking
//! pool instead of stalling a request worker.

use std::sync::Arc;

use auth::AuthenticationError;
use auth::Authenticator;
use auth::PasswordError;

/// Hash a password for storage on the blocking pool.
///
/// # Errors
/// * `HashingFailed` - Hashing backend failed or the blocking task was lost
pub async fn hash_password(
    authenticator: Arc<Authenticator>,
    password: String,
) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || authenticator.hash_password(&password))
        .await
        .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
}

/// Check a password against a stored hash on the blocking pool.
///
/// # Errors
/// * `InvalidCredentials` - Password does not match
/// * `Password` - Stored hash unreadable or the blocking task was lost
pub async fn verify_password(
    authenticator: Arc<Authenticator>,
    password: String,
    stored_hash: String,
) -> Result<(), AuthenticationError> {
    tokio::task::spawn_blocking(move || authenticator.verify_credentials(&password, &stored_hash))
        .await
        .map_err(|e| AuthenticationError::Password(PasswordError::HashingFailed(e.to_string())))?
}
