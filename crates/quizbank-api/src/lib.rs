//! # quizbank-api
//!
//! HTTP composition layer for the Quizbank content service.
//!
//! This crate provides the API surface for Quizbank, handling:
//!
//! - **Authentication**: Credential exchange and bearer token verification
//! - **Routing**: HTTP endpoint configuration
//! - **Service Wiring**: Composition of the content reader/writer over a store
//! - **Observability**: Structured request tracing and health checks
//!
//! ## Design Principles
//!
//! This crate is a **thin composition layer** with no domain policy.
//! All content logic lives in `quizbank-content`.
//!
//! ## Endpoints
//!
//! ```text
//! GET    /health                       - Health check
//! GET    /ready                        - Readiness check
//! GET    /api/openapi.json             - OpenAPI document
//! POST   /api/auth/login               - Credential exchange (anonymous)
//! GET    /api/topics                   - List topic trees (anonymous)
//! GET    /api/topics/{name}/questions  - Questions of a topic (anonymous)
//! POST   /api/topics                   - Create a topic tree (admin)
//! PUT    /api/topics/{id}              - Reconcile-update a topic tree (admin)
//! DELETE /api/topics/{id}              - Cascade-delete a topic (admin)
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use quizbank_api::server::Server;
//!
//! let server = Server::builder()
//!     .http_port(8080)
//!     .debug(true)
//!     .build();
//!
//! server.serve().await?;
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod auth;
pub mod config;
pub mod context;
pub mod error;
pub mod openapi;
pub mod routes;
pub mod server;
pub mod users;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::context::RequestContext;
    pub use crate::error::{ApiError, ApiResult};
    pub use crate::server::Server;
}
