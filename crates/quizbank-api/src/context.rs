//! Request context extraction and authentication.
//!
//! In debug mode, the principal is supplied via headers for local
//! development. In production mode, it is extracted from a verified bearer
//! token. Admin handlers call [`RequestContext::require_admin`] before doing
//! any validation or reconciliation work; the content core itself never sees
//! a principal.

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, HeaderValue};
use ulid::Ulid;

use crate::auth;
use crate::error::ApiError;
use crate::server::AppState;
use crate::users::ADMIN_ROLE;

/// Header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request context derived from authentication and headers.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Authenticated account identifier.
    pub user_id: String,
    /// Account email, when the token carried one.
    pub email: Option<String>,
    /// Role memberships of the principal.
    pub roles: Vec<String>,
    /// Request ID for tracing/correlation.
    pub request_id: String,
}

impl RequestContext {
    /// Requires the administrator role.
    ///
    /// # Errors
    ///
    /// Returns `403 Forbidden` when the principal lacks the role.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.roles.iter().any(|r| r == ADMIN_ROLE) {
            Ok(())
        } else {
            Err(
                ApiError::forbidden("administrator role required")
                    .with_request_id(self.request_id.clone()),
            )
        }
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for RequestContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(existing) = parts.extensions.get::<Self>() {
            return Ok(existing.clone());
        }

        let headers = &parts.headers;
        let request_id =
            header_string(headers, REQUEST_ID_HEADER).unwrap_or_else(|| Ulid::new().to_string());

        let ctx = if state.config.debug {
            let user_id = header_string(headers, "X-User-Id").ok_or_else(|| {
                ApiError::unauthorized("missing X-User-Id header (debug mode)")
                    .with_request_id(request_id.clone())
            })?;
            let roles = header_string(headers, "X-Roles")
                .map(|value| {
                    value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default();

            Self {
                user_id,
                email: None,
                roles,
                request_id,
            }
        } else {
            let token = bearer_token(headers)
                .ok_or_else(|| ApiError::missing_auth().with_request_id(request_id.clone()))?;

            let claims = auth::decode_access_token(&state.config.jwt, &token)
                .map_err(|_| ApiError::invalid_token().with_request_id(request_id.clone()))?;

            Self {
                user_id: claims.sub,
                email: Some(claims.email),
                roles: claims.roles,
                request_id,
            }
        };

        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let raw = header_string(headers, "Authorization")?;
    let token = raw.strip_prefix("Bearer ")?;
    Some(token.to_string())
}

fn header_string(headers: &HeaderMap, name: &str) -> Option<String> {
    let value = headers.get(name)?;
    header_value_to_string(value)
}

fn header_value_to_string(value: &HeaderValue) -> Option<String> {
    value.to_str().ok().map(str::to_string)
}
