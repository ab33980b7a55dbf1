use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

/// Number of random bytes behind every refresh token.
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Error type for refresh token generation.
#[derive(Debug, Clone, Error)]
pub enum RefreshTokenError {
    #[error("Secure random source unavailable: {0}")]
    EntropyUnavailable(String),
}

/// Generate an opaque refresh token.
///
/// 32 bytes from the operating system's random source, encoded as 64
/// lowercase hex characters. The token carries no claims; it is only
/// meaningful as a lookup key in the session store.
///
/// # Errors
/// * `EntropyUnavailable` - The OS random source failed
pub fn generate_refresh_token() -> Result<String, RefreshTokenError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| RefreshTokenError::EntropyUnavailable(e.to_string()))?;

    Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_token_shape() {
        let token = generate_refresh_token().expect("Failed to generate token");

        assert_eq!(token.len(), REFRESH_TOKEN_BYTES * 2);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens: HashSet<String> = (0..256)
            .map(|_| generate_refresh_token().unwrap())
            .collect();

        assert_eq!(tokens.len(), 256);
    }
}
