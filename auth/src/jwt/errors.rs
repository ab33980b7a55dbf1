use thiserror::Error;

/// Error type for JWT operations.
///
/// Verification failures are deterministic given the token and the key,
/// so none of them is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature does not verify")]
    BadSignature,

    #[error("Token is expired")]
    Expired,
}
