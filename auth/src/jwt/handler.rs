use std::fmt::Display;
use std::str::FromStr;

use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// Default `iss` claim written into and required from every token.
pub const DEFAULT_ISSUER: &str = "chirpy";

/// Access token codec.
///
/// Issues and verifies HS256 tokens binding a subject to an expiry instant.
/// Verification is stateless: there is no revocation list, so a signed and
/// unexpired token is always accepted and a short lifetime is the only
/// mitigation for a leaked token.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    issuer: String,
    leeway: u64,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// Expiry is checked with zero clock-skew tolerance unless
    /// [`JwtHandler::with_leeway`] says otherwise.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            issuer: DEFAULT_ISSUER.to_string(),
            leeway: 0,
        }
    }

    /// Set the issuer written into and required from tokens.
    pub fn with_issuer(mut self, issuer: impl ToString) -> Self {
        self.issuer = issuer.to_string();
        self
    }

    /// Set the clock-skew tolerance, in seconds, applied to the expiry check.
    pub fn with_leeway(mut self, leeway_seconds: u64) -> Self {
        self.leeway = leeway_seconds;
        self
    }

    /// Issue a token for `subject`, valid from now for `lifetime`.
    ///
    /// # Errors
    /// * `EncodingFailed` - The signing backend failed
    pub fn issue(&self, subject: impl ToString, lifetime: Duration) -> Result<String, JwtError> {
        let claims = Claims::new(subject, &self.issuer, Utc::now(), lifetime);
        self.encode(&claims)
    }

    /// Encode claims into a signed token.
    ///
    /// # Errors
    /// * `EncodingFailed` - The signing backend failed
    pub fn encode(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Verify a token against the wall clock and return its claims.
    ///
    /// # Errors
    /// * `Malformed` - Not a three-part token, undecodable parts, missing claims, or wrong issuer
    /// * `BadSignature` - Signature does not verify under this handler's key
    /// * `Expired` - Current time is at or past `exp` (plus leeway)
    pub fn decode(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode_at(token, Utc::now().timestamp())
    }

    /// Verify a token as of `now` (Unix timestamp).
    ///
    /// The signature is checked before the expiry, so an expired token with a
    /// forged signature reports `BadSignature`.
    pub fn decode_at(&self, token: &str, now: i64) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        // Expiry is compared here rather than by jsonwebtoken, which accepts
        // a token at exactly `exp`.
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub", "iss"]);
        validation.set_issuer(&[self.issuer.as_str()]);

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(map_decode_error)?;

        if token_data.claims.is_expired(now, self.leeway) {
            return Err(JwtError::Expired);
        }

        Ok(token_data.claims)
    }

    /// Verify a token and parse its subject as `T`.
    ///
    /// # Errors
    /// Everything [`JwtHandler::decode`] returns, plus `Malformed` when the
    /// subject does not parse as `T`.
    pub fn verify<T>(&self, token: &str) -> Result<T, JwtError>
    where
        T: FromStr,
        T::Err: Display,
    {
        let claims = self.decode(token)?;

        claims
            .sub
            .parse::<T>()
            .map_err(|e| JwtError::Malformed(format!("invalid subject: {}", e)))
    }
}

fn map_decode_error(e: jsonwebtoken::errors::Error) -> JwtError {
    match e.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => JwtError::BadSignature,
        ErrorKind::ExpiredSignature => JwtError::Expired,
        _ => JwtError::Malformed(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[test]
    fn test_issue_and_verify() {
        let handler = JwtHandler::new(SECRET);
        let user_id = Uuid::new_v4();

        let token = handler
            .issue(user_id, Duration::hours(1))
            .expect("Failed to issue token");
        assert_eq!(token.split('.').count(), 3);

        let subject: Uuid = handler.verify(&token).expect("Failed to verify token");
        assert_eq!(subject, user_id);
    }

    #[test]
    fn test_different_subjects_get_different_tokens() {
        let handler = JwtHandler::new(SECRET);
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let token1 = handler.issue(first, Duration::hours(1)).unwrap();
        let token2 = handler.issue(second, Duration::hours(1)).unwrap();
        assert_ne!(token1, token2);

        assert_eq!(handler.verify::<Uuid>(&token1).unwrap(), first);
        assert_eq!(handler.verify::<Uuid>(&token2).unwrap(), second);
    }

    #[test]
    fn test_already_expired_token() {
        let handler = JwtHandler::new(SECRET);

        let token = handler
            .issue(Uuid::new_v4(), Duration::seconds(-1))
            .expect("Failed to issue token");

        assert_eq!(handler.verify::<Uuid>(&token), Err(JwtError::Expired));
    }

    #[test]
    fn test_expiry_boundary() {
        let handler = JwtHandler::new(SECRET);
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: 1_000,
            exp: 2_000,
            iss: DEFAULT_ISSUER.to_string(),
        };
        let token = handler.encode(&claims).unwrap();

        assert!(handler.decode_at(&token, 1_999).is_ok());
        assert_eq!(handler.decode_at(&token, 2_000), Err(JwtError::Expired));
    }

    #[test]
    fn test_leeway_extends_acceptance() {
        let handler = JwtHandler::new(SECRET).with_leeway(30);
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            iat: 1_000,
            exp: 2_000,
            iss: DEFAULT_ISSUER.to_string(),
        };
        let token = handler.encode(&claims).unwrap();

        assert!(handler.decode_at(&token, 2_029).is_ok());
        assert_eq!(handler.decode_at(&token, 2_030), Err(JwtError::Expired));
    }

    #[test]
    fn test_decode_with_wrong_secret() {
        let handler1 = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!");
        let handler2 = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!");

        let token = handler1.issue(Uuid::new_v4(), Duration::hours(1)).unwrap();

        assert_eq!(handler2.verify::<Uuid>(&token), Err(JwtError::BadSignature));
    }

    #[test]
    fn test_wrong_secret_reported_before_expiry() {
        let handler1 = JwtHandler::new(b"secret1_at_least_32_bytes_long_key!");
        let handler2 = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!");

        let token = handler1
            .issue(Uuid::new_v4(), Duration::seconds(-60))
            .unwrap();

        assert_eq!(handler2.verify::<Uuid>(&token), Err(JwtError::BadSignature));
    }

    #[test]
    fn test_tampered_token_never_verifies() {
        let handler = JwtHandler::new(SECRET);
        let token = handler.issue(Uuid::new_v4(), Duration::hours(1)).unwrap();

        for (index, original) in token.char_indices() {
            let replacement = if original == 'A' { 'B' } else { 'A' };
            let mut tampered = token.clone();
            tampered.replace_range(index..index + 1, &replacement.to_string());

            match handler.verify::<Uuid>(&tampered) {
                Err(JwtError::Malformed(_)) | Err(JwtError::BadSignature) => {}
                other => panic!("tampering at {} produced {:?}", index, other),
            }
        }
    }

    #[test]
    fn test_decode_invalid_token() {
        let handler = JwtHandler::new(SECRET);

        assert!(matches!(
            handler.verify::<Uuid>("this.is.invalid"),
            Err(JwtError::Malformed(_))
        ));
        assert!(matches!(
            handler.verify::<Uuid>(""),
            Err(JwtError::Malformed(_))
        ));
        assert!(matches!(
            handler.verify::<Uuid>("not-a-token"),
            Err(JwtError::Malformed(_))
        ));
    }

    #[test]
    fn test_wrong_issuer_is_malformed() {
        let issuer_a = JwtHandler::new(SECRET).with_issuer("someone-else");
        let issuer_b = JwtHandler::new(SECRET);

        let token = issuer_a.issue(Uuid::new_v4(), Duration::hours(1)).unwrap();

        assert!(matches!(
            issuer_b.verify::<Uuid>(&token),
            Err(JwtError::Malformed(_))
        ));
    }

    #[test]
    fn test_unparseable_subject_is_malformed() {
        let handler = JwtHandler::new(SECRET);
        let token = handler.issue("not-a-uuid", Duration::hours(1)).unwrap();

        assert!(matches!(
            handler.verify::<Uuid>(&token),
            Err(JwtError::Malformed(_))
        ));
        // The same token is fine when the caller's identifier type is a string.
        assert_eq!(handler.verify::<String>(&token).unwrap(), "not-a-uuid");
    }
}
