//! notestack HTTP server.

use std::net::SocketAddr;

use anyhow::Context;
use notestack_api::telemetry::init_tracing;
use notestack_api::{app, AppState, Config, StoreBackend};
use notestack_crypto::TokenMaker;
use notestack_db::{Database, MemoryStore};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let _log_guard = init_tracing();

    let config = Config::from_env()?;
    info!(subsystem = "api", config = ?config, "Configuration loaded");

    let tokens = TokenMaker::new(config.token_symmetric_key.as_bytes())?;

    let state = match config.store_backend {
        StoreBackend::Postgres => {
            let url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres backend")?;
            let db = Database::connect_with_config(url, config.pool_config()).await?;
            db.migrate().await?;
            info!(subsystem = "db", "Migrations applied");
            AppState::from_database(db, tokens, config.access_token_duration)
        }
        StoreBackend::Memory => {
            warn!(
                subsystem = "api",
                "Using the in-memory store; data is lost on exit"
            );
            AppState::in_memory(MemoryStore::new(), tokens, config.access_token_duration)
        }
    };

    let router = app(state, &config.allowed_origins);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
