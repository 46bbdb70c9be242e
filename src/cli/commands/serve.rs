use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::config;
use crate::database::{DatabaseManager, MemoryRecordStore, PgRecordStore, RecordStore};
use crate::is_development;
use crate::services::PostService;
use crate::storage::S3UrlSigner;
use crate::AppState;

pub async fn handle(port: Option<u16>) -> anyhow::Result<()> {
    let config = config::config();
    info!("Starting Blog Post API in {:?} mode", config.environment);

    let store: Arc<dyn RecordStore> = match &config.database.url {
        Some(_) => {
            let pool = DatabaseManager::connect(&config.database).await?;
            Arc::new(PgRecordStore::new(pool).with_query_logging(config.database.enable_query_logging))
        }
        None if is_development!() => {
            warn!("DATABASE_URL not set, using the in-memory record store");
            Arc::new(MemoryRecordStore::new())
        }
        None => anyhow::bail!("DATABASE_URL must be set outside development"),
    };

    let signer = Arc::new(S3UrlSigner::from_config(&config.storage).await);
    let state = AppState::new(PostService::new(store, signer));

    let bind_addr = format!("{}:{}", config.server.host, port.unwrap_or(config.server.port));
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("Blog Post API listening on http://{}", bind_addr);

    axum::serve(listener, crate::app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
