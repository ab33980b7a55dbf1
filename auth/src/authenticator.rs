use std::fmt::Display;
use std::str::FromStr;

use chrono::Duration;
use http::HeaderMap;

use crate::bearer::extract_bearer;
use crate::bearer::BearerError;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;
use crate::refresh::generate_refresh_token;
use crate::refresh::RefreshTokenError;

/// Authentication coordinator combining credential hashing, token issuance
/// and the request authentication gate.
///
/// Holds the process-wide signing secret (inside its [`JwtHandler`]) and is
/// immutable after construction, so one instance is shared by every request.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Authentication operation errors.
///
/// The variants keep the sub-cause for server-side logging only; callers at
/// the HTTP boundary render all of them as the same unauthorized response.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    Password(#[from] PasswordError),

    #[error("Bearer extraction failed: {0}")]
    Bearer(#[from] BearerError),

    #[error("Token rejected: {0}")]
    Token(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator with default token settings.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self::with_jwt_handler(JwtHandler::new(jwt_secret))
    }

    /// Create an authenticator around a preconfigured token codec.
    pub fn with_jwt_handler(jwt_handler: JwtHandler) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `Password` - Stored hash is unreadable; a server-side fault, not a bad login
    pub fn verify_credentials(
        &self,
        password: &str,
        stored_hash: &str,
    ) -> Result<(), AuthenticationError> {
        if self.password_hasher.verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Issue an access token for `subject`.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token signing failed
    pub fn issue_access_token(
        &self,
        subject: impl ToString,
        lifetime: Duration,
    ) -> Result<String, JwtError> {
        self.jwt_handler.issue(subject, lifetime)
    }

    /// Generate a fresh opaque refresh token.
    ///
    /// # Errors
    /// * `EntropyUnavailable` - OS random source failed
    pub fn generate_refresh_token(&self) -> Result<String, RefreshTokenError> {
        generate_refresh_token()
    }

    /// Validate an access token and return its subject.
    ///
    /// # Errors
    /// * `JwtError` - Token is malformed, forged, expired, or carries an unparseable subject
    pub fn validate_token<T>(&self, token: &str) -> Result<T, JwtError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.jwt_handler.verify(token)
    }

    /// Authentication gate: turn request headers into a verified subject.
    ///
    /// Runs bearer extraction then token verification and stops at the first
    /// failure. Performs no I/O; whether the subject still refers to a live
    /// account is a separate check left to callers that need it.
    ///
    /// # Errors
    /// * `Bearer` - Header missing, wrong scheme, or empty token
    /// * `Token` - Token verification failed
    pub fn authenticate<T>(&self, headers: &HeaderMap) -> Result<T, AuthenticationError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let token = extract_bearer(headers)?;
        Ok(self.validate_token(token)?)
    }
}

#[cfg(test)]
mod tests {
    use http::header::AUTHORIZATION;
    use http::HeaderValue;
    use uuid::Uuid;

    use super::*;

    const SECRET: &[u8] = b"test_secret_key_at_least_32_bytes!";

    fn bearer_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_verify_credentials_success() {
        let authenticator = Authenticator::new(SECRET);

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        assert!(authenticator.verify_credentials("my_password", &hash).is_ok());
    }

    #[test]
    fn test_verify_credentials_mismatch() {
        let authenticator = Authenticator::new(SECRET);
        let hash = authenticator.hash_password("my_password").unwrap();

        let result = authenticator.verify_credentials("wrong_password", &hash);
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_verify_credentials_corrupt_hash() {
        let authenticator = Authenticator::new(SECRET);

        let result = authenticator.verify_credentials("my_password", "corrupt");
        assert!(matches!(
            result,
            Err(AuthenticationError::Password(PasswordError::InvalidFormat(_)))
        ));
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = Authenticator::new(SECRET);
        let user_id = Uuid::new_v4();

        let token = authenticator
            .issue_access_token(user_id, Duration::hours(1))
            .expect("Failed to issue token");

        let subject: Uuid = authenticator
            .authenticate(&bearer_headers(&token))
            .expect("Authentication failed");
        assert_eq!(subject, user_id);
    }

    #[test]
    fn test_authenticate_missing_header() {
        let authenticator = Authenticator::new(SECRET);

        let result = authenticator.authenticate::<Uuid>(&HeaderMap::new());
        assert!(matches!(
            result,
            Err(AuthenticationError::Bearer(BearerError::Missing))
        ));
    }

    #[test]
    fn test_authenticate_expired_token() {
        let authenticator = Authenticator::new(SECRET);
        let token = authenticator
            .issue_access_token(Uuid::new_v4(), Duration::seconds(-1))
            .unwrap();

        let result = authenticator.authenticate::<Uuid>(&bearer_headers(&token));
        assert!(matches!(
            result,
            Err(AuthenticationError::Token(JwtError::Expired))
        ));
    }

    #[test]
    fn test_authenticate_garbled_token() {
        let authenticator = Authenticator::new(SECRET);

        let result = authenticator.authenticate::<Uuid>(&bearer_headers("invalid.token.here"));
        assert!(matches!(
            result,
            Err(AuthenticationError::Token(JwtError::Malformed(_)))
        ));
    }

    #[test]
    fn test_authenticate_foreign_key() {
        let ours = Authenticator::new(SECRET);
        let theirs = Authenticator::new(b"another_secret_key_at_least_32_bytes");

        let token = theirs
            .issue_access_token(Uuid::new_v4(), Duration::hours(1))
            .unwrap();

        let result = ours.authenticate::<Uuid>(&bearer_headers(&token));
        assert!(matches!(
            result,
            Err(AuthenticationError::Token(JwtError::BadSignature))
        ));
    }

    #[test]
    fn test_refresh_tokens_differ() {
        let authenticator = Authenticator::new(SECRET);

        let first = authenticator.generate_refresh_token().unwrap();
        let second = authenticator.generate_refresh_token().unwrap();
        assert_ne!(first, second);
    }
}
