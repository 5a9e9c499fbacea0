//! API server implementation.
//!
//! Provides health, ready, and API endpoints for the Quizbank content
//! service.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use quizbank_content::{ContentReader, ContentStore, ContentWriter, MemoryStore};
use quizbank_core::{Error, Result, TopicId};

use crate::config::{Config, CorsConfig};
use crate::users::UserDirectory;

/// Default administrator email seeded in debug mode.
const DEBUG_ADMIN_EMAIL: &str = "admin@quizbank.dev";

/// Default administrator password seeded in debug mode.
const DEBUG_ADMIN_PASSWORD: &str = "quizbank-dev-password";

// ============================================================================
// Health and Ready Responses
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ReadyResponse {
    /// Service readiness status.
    pub ready: bool,
    /// Optional message about readiness state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Config,
    /// Seeded account directory.
    pub users: Arc<UserDirectory>,
    /// Content store backend.
    store: Arc<dyn ContentStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("users", &self.users)
            .field("store", &"<ContentStore>")
            .finish()
    }
}

impl AppState {
    /// Creates new application state.
    #[must_use]
    pub fn new(config: Config, store: Arc<dyn ContentStore>, users: Arc<UserDirectory>) -> Self {
        Self {
            config,
            users,
            store,
        }
    }

    /// Returns the content store backend.
    #[must_use]
    pub fn store(&self) -> Arc<dyn ContentStore> {
        Arc::clone(&self.store)
    }

    /// Creates a content reader over the store.
    #[must_use]
    pub fn reader(&self) -> ContentReader {
        ContentReader::new(self.store())
    }

    /// Creates a content writer over the store.
    #[must_use]
    pub fn writer(&self) -> ContentWriter {
        ContentWriter::new(self.store())
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Health check endpoint handler.
///
/// Returns 200 OK if the service is alive. This is a shallow check
/// that doesn't verify dependencies.
async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness check endpoint handler.
///
/// Returns 200 OK if the service is ready to accept requests.
/// A probe lookup of a missing key is sufficient to validate the store path.
async fn ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.store.find_by_id(TopicId::new(i64::MAX)).await {
        Ok(_) => (
            StatusCode::OK,
            Json(ReadyResponse {
                ready: true,
                message: None,
            }),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ReadyResponse {
                ready: false,
                message: Some(format!("store check failed: {e}")),
            }),
        ),
    }
}

/// Serves the generated `OpenAPI` document.
async fn openapi_json() -> impl IntoResponse {
    match crate::openapi::openapi_json() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("failed to render OpenAPI document: {e}"),
        )
            .into_response(),
    }
}

// ============================================================================
// Server
// ============================================================================

/// An additional account seeded into the directory (primarily tests).
#[derive(Debug, Clone)]
struct SeedAccount {
    email: String,
    password: String,
    roles: Vec<String>,
}

/// The Quizbank API server.
pub struct Server {
    config: Config,
    store: Arc<dyn ContentStore>,
    extra_accounts: Vec<SeedAccount>,
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("store", &"<ContentStore>")
            .finish()
    }
}

impl Server {
    /// Creates a new server with the given configuration.
    ///
    /// Defaults to in-memory storage; use `with_store` for an explicit
    /// backend.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: Arc::new(MemoryStore::new()),
            extra_accounts: Vec::new(),
        }
    }

    /// Creates a new server with an explicit store backend.
    #[must_use]
    pub fn with_store(config: Config, store: Arc<dyn ContentStore>) -> Self {
        Self {
            config,
            store,
            extra_accounts: Vec::new(),
        }
    }

    /// Creates a new `ServerBuilder`.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Builds the seeded account directory from configuration.
    fn build_users(&self) -> Result<UserDirectory> {
        let mut directory = match (
            self.config.admin.email.as_deref(),
            self.config.admin.password.as_deref(),
        ) {
            (Some(email), Some(password)) => UserDirectory::with_seeded_admin(email, password)?,
            _ if self.config.debug => {
                tracing::warn!(
                    email = DEBUG_ADMIN_EMAIL,
                    "No administrator configured; seeding default debug account"
                );
                UserDirectory::with_seeded_admin(DEBUG_ADMIN_EMAIL, DEBUG_ADMIN_PASSWORD)?
            }
            _ => {
                return Err(Error::InvalidInput(
                    "QUIZBANK_ADMIN_EMAIL and QUIZBANK_ADMIN_PASSWORD are required when debug=false"
                        .to_string(),
                ))
            }
        };

        for account in &self.extra_accounts {
            directory.seed_account(&account.email, &account.password, account.roles.clone())?;
        }

        Ok(directory)
    }

    /// Creates the router with all routes and middleware.
    fn create_router(&self) -> Result<Router> {
        let users = Arc::new(self.build_users()?);
        let state = Arc::new(AppState::new(
            self.config.clone(),
            Arc::clone(&self.store),
            users,
        ));

        let cors = self.build_cors_layer();

        Ok(Router::new()
            // Health, ready, and docs endpoints (no auth required)
            .route("/health", get(health))
            .route("/ready", get(ready))
            .route("/api/openapi.json", get(openapi_json))
            // API routes; admin handlers authenticate via RequestContext
            .nest("/api", crate::routes::api_routes())
            // Middleware (order matters): trace outermost, then CORS.
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            // Shared state
            .with_state(state))
    }

    /// Builds the CORS layer from configuration.
    fn build_cors_layer(&self) -> CorsLayer {
        let cors_config = &self.config.cors;
        let cors = Self::build_cors_base(cors_config);
        Self::apply_cors_allowed_origins(cors, cors_config)
    }

    fn build_cors_base(cors_config: &CorsConfig) -> CorsLayer {
        CorsLayer::new()
            // Allow common methods for REST API + preflight
            .allow_methods([
                Method::GET,
                Method::HEAD,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            // Allow common headers including auth
            .allow_headers([
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT,
                // Custom headers for debug identity and correlation
                header::HeaderName::from_static("x-user-id"),
                header::HeaderName::from_static("x-roles"),
                header::HeaderName::from_static("x-request-id"),
            ])
            // Expose headers the browser needs to read
            .expose_headers([
                header::CONTENT_TYPE,
                header::CONTENT_LENGTH,
                header::HeaderName::from_static("x-request-id"),
            ])
            // Set max age for preflight caching
            .max_age(Duration::from_secs(cors_config.max_age_seconds))
    }

    fn cors_allows_any_origin(cors_config: &CorsConfig) -> bool {
        cors_config.allowed_origins.len() == 1
            && cors_config
                .allowed_origins
                .first()
                .is_some_and(|origin| origin == "*")
    }

    fn apply_cors_allowed_origins(cors: CorsLayer, cors_config: &CorsConfig) -> CorsLayer {
        if cors_config.allowed_origins.is_empty() {
            return cors;
        }

        if Self::cors_allows_any_origin(cors_config) {
            return cors.allow_origin(Any);
        }

        let mut allowed = Vec::new();
        for origin in &cors_config.allowed_origins {
            match HeaderValue::from_str(origin) {
                Ok(value) => allowed.push(value),
                Err(_) => {
                    tracing::error!(
                        origin = %origin,
                        "Invalid CORS origin; expected a valid HeaderValue"
                    );
                }
            }
        }

        if allowed.is_empty() {
            tracing::warn!("All configured CORS origins were invalid; disabling CORS");
            cors
        } else {
            tracing::info!(origins = ?cors_config.allowed_origins, "CORS configured");
            cors.allow_origin(AllowOrigin::list(allowed))
        }
    }

    /// Starts the server and blocks until shutdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the server cannot
    /// bind to the port.
    pub async fn serve(&self) -> Result<()> {
        self.validate_config()?;

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let router = self.create_router()?;

        tracing::info!(
            http_port = self.config.http_port,
            debug = self.config.debug,
            "Starting Quizbank API server"
        );

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Internal {
                message: format!("failed to bind to {addr}: {e}"),
            })?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal {
                message: format!("server error: {e}"),
            })?;

        Ok(())
    }

    /// Creates a test router for the server.
    ///
    /// This is useful for integration tests where you want to test
    /// the routes without actually binding to a port.
    ///
    /// # Note
    ///
    /// This method is intended for testing only. It creates a router
    /// using this server's configured store backend (default: in-memory).
    ///
    /// # Panics
    ///
    /// Panics when the configured administrator account cannot be seeded.
    #[doc(hidden)]
    #[must_use]
    pub fn test_router(&self) -> Router {
        self.create_router().expect("failed to build test router")
    }

    fn validate_config(&self) -> Result<()> {
        // Enforce "no wildcard in production" for CORS.
        if !self.config.debug
            && self
                .config
                .cors
                .allowed_origins
                .iter()
                .any(|origin| origin == "*")
        {
            return Err(Error::InvalidInput(
                "cors.allowed_origins cannot include '*' when debug=false".to_string(),
            ));
        }

        // Require JWT and admin configuration in production mode.
        if !self.config.debug {
            self.config.jwt.validate()?;

            if self.config.admin.email.is_none() || self.config.admin.password.is_none() {
                return Err(Error::InvalidInput(
                    "QUIZBANK_ADMIN_EMAIL and QUIZBANK_ADMIN_PASSWORD are required when debug=false"
                        .to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Builder for constructing a server.
pub struct ServerBuilder {
    config: Config,
    store: Arc<dyn ContentStore>,
    extra_accounts: Vec<SeedAccount>,
}

impl std::fmt::Debug for ServerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerBuilder")
            .field("config", &self.config)
            .field("store", &"<ContentStore>")
            .finish()
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self {
            config: Config::default(),
            store: Arc::new(MemoryStore::new()),
            extra_accounts: Vec::new(),
        }
    }
}

impl ServerBuilder {
    /// Creates a new server builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP port.
    #[must_use]
    pub fn http_port(mut self, port: u16) -> Self {
        self.config.http_port = port;
        self
    }

    /// Enables debug mode.
    ///
    /// See `Config::debug` for behavior changes (header-based identity vs
    /// Authorization).
    #[must_use]
    pub fn debug(mut self, enabled: bool) -> Self {
        self.config.debug = enabled;
        self
    }

    /// Sets the JWT HS256 secret used for bearer token signing and
    /// verification.
    ///
    /// Required when `debug` is false.
    #[must_use]
    pub fn jwt_hs256_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt.hs256_secret = Some(secret.into());
        self
    }

    /// Sets the seeded administrator account.
    #[must_use]
    pub fn admin_account(mut self, email: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.admin.email = Some(email.into());
        self.config.admin.password = Some(password.into());
        self
    }

    /// Seeds an additional account with the given roles (primarily tests).
    #[must_use]
    pub fn seed_account(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
        roles: Vec<String>,
    ) -> Self {
        self.extra_accounts.push(SeedAccount {
            email: email.into(),
            password: password.into(),
            roles,
        });
        self
    }

    /// Sets the content store used by request handlers.
    ///
    /// By default, the server uses an in-memory store intended only for
    /// tests/dev.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn ContentStore>) -> Self {
        self.store = store;
        self
    }

    /// Builds the server.
    #[must_use]
    pub fn build(self) -> Server {
        let mut server = Server::with_store(self.config, self.store);
        server.extra_accounts = self.extra_accounts;
        server
    }
}
