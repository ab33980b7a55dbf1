use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Access token claim set.
///
/// Binds a subject to an issue and expiry instant. Nothing else is carried:
/// tier or role attributes are looked up per request where a predicate needs
/// them, so a stale token can never grant a revoked privilege.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Create claims for `subject`, issued at `now` and valid for `lifetime`.
    ///
    /// A negative `lifetime` yields claims that are already expired.
    pub fn new(
        subject: impl ToString,
        issuer: impl ToString,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            sub: subject.to_string(),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            iss: issuer.to_string(),
        }
    }

    /// Whether the token is expired at `current_timestamp`, tolerating
    /// `leeway` seconds of clock skew.
    ///
    /// The expiry instant itself is already expired.
    pub fn is_expired(&self, current_timestamp: i64, leeway: u64) -> bool {
        let leeway = i64::try_from(leeway).unwrap_or(i64::MAX);
        current_timestamp >= self.exp.saturating_add(leeway)
    }
}
