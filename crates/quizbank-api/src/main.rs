//! `quizbank-api` binary entrypoint.
//!
//! Loads configuration from environment variables and starts the HTTP server.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use std::sync::Arc;

use anyhow::Result;

use quizbank_api::config::Config;
use quizbank_api::server::Server;
use quizbank_content::{ContentStore, MemoryStore};
use quizbank_core::observability::{init_logging, LogFormat};

fn choose_log_format(config: &Config) -> LogFormat {
    if config.debug {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    init_logging(choose_log_format(&config));

    // The store trait is the persistence seam; the in-memory backend is the
    // reference implementation shipped with this service.
    if !config.debug {
        tracing::warn!("Using in-memory content store; data does not survive restarts");
    }
    let store: Arc<dyn ContentStore> = Arc::new(MemoryStore::new());

    let server = Server::with_store(config, store);
    server.serve().await?;
    Ok(())
}
