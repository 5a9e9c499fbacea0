//! Server configuration.
//!
//! Configuration is loaded from `QUIZBANK_*` environment variables with
//! sensible development defaults. Production deployments (`debug = false`)
//! must configure the JWT signing secret and the seeded administrator
//! account; the server refuses to start otherwise.

use serde::{Deserialize, Serialize};

use quizbank_core::{Error, Result};

/// Default access-token TTL in seconds (the fixed 1-hour validity window).
pub const DEFAULT_TOKEN_TTL_SECONDS: u64 = 3_600;

/// Maximum supported access-token TTL in seconds.
pub const MAX_TOKEN_TTL_SECONDS: u64 = 86_400;

/// Configuration for the Quizbank API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server port.
    pub http_port: u16,

    /// Enable debug mode.
    ///
    /// When enabled:
    /// - `RequestContext` is extracted from `X-User-Id` / `X-Roles` headers (dev/tests)
    ///
    /// When disabled:
    /// - `Authorization: Bearer <jwt>` is required on admin routes
    pub debug: bool,

    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,

    /// JWT configuration for token issuance and verification.
    #[serde(default)]
    pub jwt: JwtConfig,

    /// Seeded administrator account.
    #[serde(default)]
    pub admin: AdminAccountConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 8080,
            debug: false,
            cors: CorsConfig::default(),
            jwt: JwtConfig::default(),
            admin: AdminAccountConfig::default(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. `["*"]` allows any origin (debug only).
    pub allowed_origins: Vec<String>,
    /// Preflight cache duration in seconds.
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3_600,
        }
    }
}

/// JWT configuration for access tokens.
#[derive(Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 secret for signing and validating tokens.
    #[serde(default)]
    pub hs256_secret: Option<String>,
    /// Optional issuer (`iss`) to stamp and enforce.
    #[serde(default)]
    pub issuer: Option<String>,
    /// Optional audience (`aud`) to stamp and enforce.
    #[serde(default)]
    pub audience: Option<String>,
    /// Token time-to-live in seconds.
    #[serde(default = "default_token_ttl_seconds")]
    pub ttl_seconds: u64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            hs256_secret: None,
            issuer: None,
            audience: None,
            ttl_seconds: default_token_ttl_seconds(),
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("hs256_secret", &self.hs256_secret.as_ref().map(|_| "[REDACTED]"))
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

const fn default_token_ttl_seconds() -> u64 {
    DEFAULT_TOKEN_TTL_SECONDS
}

impl JwtConfig {
    /// Returns the configured secret.
    ///
    /// # Errors
    ///
    /// Returns an error when no secret is configured.
    pub fn secret(&self) -> Result<&str> {
        self.hs256_secret
            .as_deref()
            .filter(|secret| !secret.trim().is_empty())
            .ok_or_else(|| Error::InvalidInput("jwt.hs256_secret is not configured".to_string()))
    }

    /// Returns the token TTL as a `chrono::Duration`.
    #[must_use]
    pub fn ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX))
    }

    /// Validates configuration sanity.
    ///
    /// # Errors
    ///
    /// Returns an error when required fields are missing or out of range.
    pub fn validate(&self) -> Result<()> {
        self.secret()?;
        if self.ttl_seconds == 0 {
            return Err(Error::InvalidInput(
                "jwt.ttl_seconds must be greater than zero".to_string(),
            ));
        }
        if self.ttl_seconds > MAX_TOKEN_TTL_SECONDS {
            return Err(Error::InvalidInput(format!(
                "jwt.ttl_seconds must be at most {MAX_TOKEN_TTL_SECONDS}"
            )));
        }
        Ok(())
    }
}

/// Seeded administrator account configuration.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AdminAccountConfig {
    /// Administrator email.
    #[serde(default)]
    pub email: Option<String>,
    /// Administrator password (hashed at startup, never stored in plain).
    #[serde(default)]
    pub password: Option<String>,
}

impl std::fmt::Debug for AdminAccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminAccountConfig")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QUIZBANK_HTTP_PORT` — HTTP port (default 8080)
    /// - `QUIZBANK_DEBUG` — debug mode (`true`/`false`, default false)
    /// - `QUIZBANK_CORS_ALLOWED_ORIGINS` — comma-separated origin list
    /// - `QUIZBANK_CORS_MAX_AGE_SECONDS` — preflight cache duration
    /// - `QUIZBANK_JWT_SECRET` — HS256 signing secret
    /// - `QUIZBANK_JWT_ISSUER` / `QUIZBANK_JWT_AUDIENCE` — optional claims
    /// - `QUIZBANK_JWT_TTL_SECS` — token validity window (default 3600)
    /// - `QUIZBANK_ADMIN_EMAIL` / `QUIZBANK_ADMIN_PASSWORD` — seeded admin
    ///
    /// # Errors
    ///
    /// Returns an error if a variable fails to parse or is out of range.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = env_u16("QUIZBANK_HTTP_PORT")? {
            config.http_port = port;
        }
        if let Some(debug) = env_bool("QUIZBANK_DEBUG")? {
            config.debug = debug;
        }
        if let Some(origins) = env_string("QUIZBANK_CORS_ALLOWED_ORIGINS") {
            config.cors.allowed_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(max_age) = env_u64("QUIZBANK_CORS_MAX_AGE_SECONDS")? {
            config.cors.max_age_seconds = max_age;
        }
        if let Some(secret) = env_string("QUIZBANK_JWT_SECRET") {
            config.jwt.hs256_secret = Some(secret);
        }
        if let Some(issuer) = env_string("QUIZBANK_JWT_ISSUER") {
            config.jwt.issuer = Some(issuer);
        }
        if let Some(audience) = env_string("QUIZBANK_JWT_AUDIENCE") {
            config.jwt.audience = Some(audience);
        }
        if let Some(ttl) = env_u64("QUIZBANK_JWT_TTL_SECS")? {
            if ttl == 0 {
                return Err(Error::InvalidInput(
                    "QUIZBANK_JWT_TTL_SECS must be greater than 0".to_string(),
                ));
            }
            if ttl > MAX_TOKEN_TTL_SECONDS {
                return Err(Error::InvalidInput(format!(
                    "QUIZBANK_JWT_TTL_SECS must be at most {MAX_TOKEN_TTL_SECONDS}"
                )));
            }
            config.jwt.ttl_seconds = ttl;
        }
        if let Some(email) = env_string("QUIZBANK_ADMIN_EMAIL") {
            config.admin.email = Some(email);
        }
        if let Some(password) = env_string("QUIZBANK_ADMIN_PASSWORD") {
            config.admin.password = Some(password);
        }

        Ok(config)
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_bool(key: &str) -> Result<Option<bool>> {
    match env_string(key) {
        None => Ok(None),
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            other => Err(Error::InvalidInput(format!(
                "{key} must be true or false, got '{other}'"
            ))),
        },
    }
}

fn env_u16(key: &str) -> Result<Option<u16>> {
    env_string(key)
        .map(|value| {
            value
                .parse::<u16>()
                .map_err(|e| Error::InvalidInput(format!("{key} must be a port number: {e}")))
        })
        .transpose()
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    env_string(key)
        .map(|value| {
            value
                .parse::<u64>()
                .map_err(|e| Error::InvalidInput(format!("{key} must be an integer: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.http_port, 8080);
        assert!(!config.debug);
        assert_eq!(config.jwt.ttl_seconds, DEFAULT_TOKEN_TTL_SECONDS);
        assert!(config.jwt.hs256_secret.is_none());
    }

    #[test]
    fn test_jwt_validate_requires_secret() {
        let config = JwtConfig::default();
        let err = config.validate().expect_err("must fail");
        assert!(matches!(err, Error::InvalidInput(_)));

        let config = JwtConfig {
            hs256_secret: Some("secret".to_string()),
            ..JwtConfig::default()
        };
        config.validate().expect("valid");
    }

    #[test]
    fn test_jwt_validate_rejects_zero_ttl() {
        let config = JwtConfig {
            hs256_secret: Some("secret".to_string()),
            ttl_seconds: 0,
            ..JwtConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let jwt = JwtConfig {
            hs256_secret: Some("super-secret".to_string()),
            ..JwtConfig::default()
        };
        let rendered = format!("{jwt:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("REDACTED"));
    }
}
