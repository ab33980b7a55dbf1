//! Authentication core library
//!
//! Provides the credential and session primitives shared by every protected
//! endpoint of the service:
//! - Password hashing (Argon2id)
//! - Access token issuance and verification (HS256 JWT with expiry)
//! - Opaque refresh token generation
//! - `Authorization` header parsing (`Bearer` and `ApiKey` schemes)
//! - The authentication gate combining header parsing and token verification
//!
//! Nothing here performs I/O. Refresh token persistence and authorization
//! decisions belong to the service that consumes this crate.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("other_password", &hash).unwrap());
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::JwtHandler;
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let token = handler.issue("user123", Duration::hours(1)).unwrap();
//! let subject: String = handler.verify(&token).unwrap();
//! assert_eq!(subject, "user123");
//! ```
//!
//! ## Authentication Gate
//! ```
//! use auth::Authenticator;
//! use chrono::Duration;
//! use http::header::AUTHORIZATION;
//! use http::HeaderMap;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!");
//! let token = auth.issue_access_token("user123", Duration::minutes(5)).unwrap();
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(AUTHORIZATION, format!("Bearer {}", token).parse().unwrap());
//!
//! let subject: String = auth.authenticate(&headers).unwrap();
//! assert_eq!(subject, "user123");
//! ```

pub mod authenticator;
pub mod bearer;
pub mod jwt;
pub mod password;
pub mod refresh;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use bearer::extract_api_key;
pub use bearer::extract_bearer;
pub use bearer::BearerError;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::generate_refresh_token;
pub use refresh::RefreshTokenError;
