//! Observability infrastructure for Quizbank.
//!
//! Structured logging with consistent spans. This module provides
//! initialization helpers and span constructors so that every component logs
//! the same fields for the same kind of work.

use std::sync::Once;
use tracing::Span;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static INIT: Once = Once::new();

/// Log output format.
#[derive(Debug, Clone, Copy, Default)]
pub enum LogFormat {
    /// JSON structured logs (for production).
    Json,
    /// Pretty-printed logs (for development).
    #[default]
    Pretty,
}

/// Initializes the logging subsystem.
///
/// Call once at application startup. Safe to call multiple times;
/// subsequent calls are no-ops.
///
/// # Environment Variables
///
/// - `RUST_LOG`: Controls log levels (e.g., `info`, `quizbank_content=debug`)
///
/// # Example
///
/// ```rust
/// use quizbank_core::observability::{init_logging, LogFormat};
///
/// init_logging(LogFormat::Pretty);
/// ```
pub fn init_logging(format: LogFormat) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        match format {
            LogFormat::Json => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().json())
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().pretty())
                    .init();
            }
        }
    });
}

/// Creates a span for content operations with standard fields.
///
/// # Example
///
/// ```rust
/// use quizbank_core::observability::content_span;
///
/// let span = content_span("update_topic", 42);
/// let _guard = span.enter();
/// // ... do content operation
/// ```
#[must_use]
pub fn content_span(operation: &str, topic_id: i64) -> Span {
    tracing::info_span!(
        "content",
        op = operation,
        topic_id = topic_id,
    )
}
