//! Access-token minting and validation.
//!
//! Tokens are HS256-signed JWTs carrying the subject id, email, a unique
//! token id, and one role string per role membership, valid for the
//! configured window (1 hour by default).

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use quizbank_core::{Error, Result};

use crate::config::JwtConfig;
use crate::users::UserAccount;

/// Canonical access-token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Subject: the account identifier.
    pub sub: String,
    /// Account email.
    pub email: String,
    /// Unique token identifier.
    pub jti: String,
    /// One entry per role the account holds.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Expiry (unix timestamp seconds).
    pub exp: usize,
    /// Not-before (unix timestamp seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<usize>,
    /// Issued-at (unix timestamp seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<usize>,
    /// Optional issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// Optional audience.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Result of minting an access token.
#[derive(Debug, Clone)]
pub struct MintedAccessToken {
    /// Signed JWT.
    pub token: String,
    /// Token expiry timestamp.
    pub expires_at: DateTime<Utc>,
}

fn timestamp_to_usize(value: i64, field: &str) -> Result<usize> {
    usize::try_from(value)
        .map_err(|_| Error::InvalidInput(format!("{field} timestamp out of range")))
}

/// Mints an access token for an authenticated account.
///
/// # Errors
///
/// Returns an error when configuration is invalid or signing fails.
pub fn mint_access_token(
    config: &JwtConfig,
    user: &UserAccount,
    now: DateTime<Utc>,
) -> Result<MintedAccessToken> {
    config.validate()?;

    let expires_at = now + config.ttl();
    let claims = AccessTokenClaims {
        sub: user.id.clone(),
        email: user.email.clone(),
        jti: Ulid::new().to_string(),
        roles: user.roles.clone(),
        exp: timestamp_to_usize(expires_at.timestamp(), "exp")?,
        nbf: Some(timestamp_to_usize(now.timestamp(), "nbf")?),
        iat: Some(timestamp_to_usize(now.timestamp(), "iat")?),
        iss: config.issuer.clone(),
        aud: config.audience.clone(),
    };

    let token = jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret()?.as_bytes()),
    )
    .map_err(|e| Error::internal(format!("access token minting failed: {e}")))?;

    Ok(MintedAccessToken { token, expires_at })
}

/// Decodes and validates an access token.
///
/// # Errors
///
/// Returns an error when configuration is invalid or token validation fails
/// (bad signature, expired, not yet valid, wrong issuer/audience).
pub fn decode_access_token(config: &JwtConfig, token: &str) -> Result<AccessTokenClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_nbf = true;

    if let Some(iss) = config.issuer.as_deref() {
        validation.set_issuer(&[iss]);
    }
    if let Some(aud) = config.audience.as_deref() {
        validation.set_audience(&[aud]);
    }

    let data = jsonwebtoken::decode::<AccessTokenClaims>(
        token,
        &DecodingKey::from_secret(config.secret()?.as_bytes()),
        &validation,
    )
    .map_err(|e| Error::InvalidInput(format!("invalid access token: {e}")))?;

    Ok(data.claims)
}
