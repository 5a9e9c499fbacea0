//! Authentication routes.
//!
//! ## Routes
//!
//! - `POST /auth/login` - Exchange credentials for a bearer token

use std::sync::Arc;

use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::mint_access_token;
use crate::error::{ApiError, ApiErrorBody};
use crate::server::AppState;
use crate::users::ADMIN_ROLE;

/// Login request.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Login response.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Signed bearer token.
    pub token: String,
    /// Token expiry timestamp (ISO 8601).
    pub expires_at: String,
}

/// Creates auth routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/login", post(login))
}

/// Exchange credentials for a bearer token.
///
/// POST /api/auth/login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ApiErrorBody),
        (status = 403, description = "Account lacks the administrator role", body = ApiErrorBody),
        (status = 500, description = "Internal error", body = ApiErrorBody),
    )
)]
pub(crate) async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(account) = state.users.verify_credentials(&req.email, &req.password) else {
        tracing::warn!(email = %req.email, "Rejected login with invalid credentials");
        return Err(ApiError::unauthorized("invalid credentials"));
    };

    // Credentials are valid, but only administrators may hold a token.
    if !account.has_role(ADMIN_ROLE) {
        tracing::warn!(email = %req.email, "Rejected login for non-administrator account");
        return Err(ApiError::forbidden(
            "account does not hold the administrator role",
        ));
    }

    let minted = mint_access_token(&state.config.jwt, account, Utc::now())
        .map_err(|e| ApiError::internal(e.to_string()))?;

    tracing::info!(user = %account.id, "Issued access token");

    Ok(Json(LoginResponse {
        token: minted.token,
        expires_at: minted.expires_at.to_rfc3339(),
    }))
}
