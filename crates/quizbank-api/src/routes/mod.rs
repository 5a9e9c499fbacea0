//! HTTP route handlers.

pub mod auth;
pub mod topics;

use std::sync::Arc;

use axum::Router;

use crate::server::AppState;

/// `/api` routes.
///
/// Anonymous reads and login are open; admin write handlers authenticate via
/// the [`crate::context::RequestContext`] extractor and require the
/// administrator role before any content work begins.
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new().merge(auth::routes()).merge(topics::routes())
}
