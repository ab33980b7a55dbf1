use std::env;
use std::fmt;

use auth::Authenticator;
use auth::JwtHandler;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::session::models::SessionPolicy;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub session: SessionConfig,
    pub membership: MembershipConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

/// Without a `url` the service runs on the in-memory backend.
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_access_token_ttl")]
    pub access_token_ttl_seconds: i64,
    #[serde(default = "default_access_token_ttl")]
    pub max_access_token_ttl_seconds: i64,
    #[serde(default)]
    pub leeway_seconds: u64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("access_token_ttl_seconds", &self.access_token_ttl_seconds)
            .field(
                "max_access_token_ttl_seconds",
                &self.max_access_token_ttl_seconds,
            )
            .field("leeway_seconds", &self.leeway_seconds)
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    #[serde(default = "default_refresh_token_ttl_days")]
    pub refresh_token_ttl_days: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            refresh_token_ttl_days: default_refresh_token_ttl_days(),
        }
    }
}

/// Credentials for the payment provider webhook.
#[derive(Deserialize, Clone)]
pub struct MembershipConfig {
    pub api_key: String,
}

impl fmt::Debug for MembershipConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MembershipConfig")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_issuer() -> String {
    auth::jwt::DEFAULT_ISSUER.to_string()
}

fn default_access_token_ttl() -> i64 {
    3600
}

fn default_refresh_token_ttl_days() -> i64 {
    60
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot run with.
    ///
    /// # Errors
    /// * `Message` - Empty signing secret or API key, or a non-positive lifetime
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        if self.membership.api_key.is_empty() {
            return Err(ConfigError::Message(
                "membership.api_key must not be empty".into(),
            ));
        }
        if self.jwt.access_token_ttl_seconds <= 0 || self.jwt.max_access_token_ttl_seconds <= 0 {
            return Err(ConfigError::Message(
                "access token lifetimes must be positive".into(),
            ));
        }
        if self.session.refresh_token_ttl_days <= 0 {
            return Err(ConfigError::Message(
                "session.refresh_token_ttl_days must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Build the process-wide authenticator holding the signing secret.
    pub fn authenticator(&self) -> Authenticator {
        let jwt_handler = JwtHandler::new(self.jwt.secret.as_bytes())
            .with_issuer(&self.jwt.issuer)
            .with_leeway(self.jwt.leeway_seconds);
        Authenticator::with_jwt_handler(jwt_handler)
    }

    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy::new(
            chrono::Duration::seconds(self.jwt.access_token_ttl_seconds),
            chrono::Duration::seconds(self.jwt.max_access_token_ttl_seconds),
            chrono::Duration::days(self.session.refresh_token_ttl_days),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            server: ServerConfig { http_port: 8080 },
            database: DatabaseConfig::default(),
            jwt: JwtConfig {
                secret: "super_secret_signing_key".to_string(),
                issuer: default_issuer(),
                access_token_ttl_seconds: 3600,
                max_access_token_ttl_seconds: 3600,
                leeway_seconds: 0,
            },
            session: SessionConfig::default(),
            membership: MembershipConfig {
                api_key: "f271c81ff7084ee5b99a5091b42d486e".to_string(),
            },
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_secret() {
        let mut config = config();
        config.jwt.secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", config());
        assert!(!rendered.contains("super_secret_signing_key"));
        assert!(!rendered.contains("f271c81ff7084ee5b99a5091b42d486e"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_session_policy_from_config() {
        let policy = config().session_policy();
        assert_eq!(policy.refresh_token_ttl(), chrono::Duration::days(60));
        assert_eq!(policy.access_lifetime(None), chrono::Duration::hours(1));
    }
}
