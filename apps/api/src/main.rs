mod auth;
mod config;
mod db;
mod errors;
mod generation;
mod llm_client;
mod models;
mod routes;
mod sops;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::memory::MemoryUserStore;
use crate::auth::session::SessionKeys;
use crate::auth::store::{PgUserStore, UserStore};
use crate::config::{Config, StorageBackend};
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::sops::memory::MemorySopStore;
use crate::sops::store::{PgSopStore, SopStore};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SOP API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize storage
    let (sops, users): (Arc<dyn SopStore>, Arc<dyn UserStore>) = match config.storage_backend {
        StorageBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            let db = create_pool(url).await?;
            (
                Arc::new(PgSopStore::new(db.clone())),
                Arc::new(PgUserStore::new(db)),
            )
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; documents are lost on restart");
            (
                Arc::new(MemorySopStore::new()),
                Arc::new(MemoryUserStore::new()),
            )
        }
    };

    // Initialize LLM client
    let llm = LlmClient::new(config.openai_api_key.clone(), config.openai_api_url.clone())?;
    if llm.is_configured() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else {
        warn!("OPENAI_API_KEY not set; all generation uses the template generator");
    }

    let sessions = SessionKeys::new(&config.session_secret, config.session_ttl_secs);

    // Build app state
    let state = AppState {
        sops,
        users,
        llm,
        sessions,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's domain is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
