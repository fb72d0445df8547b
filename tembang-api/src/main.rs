//! Tembang API Server Entry Point
//!
//! Reads configuration from the environment, opens the store and the cache
//! layer, and serves the Axum router until ctrl-c.

use std::net::SocketAddr;
use std::sync::Arc;

use tembang_api::telemetry::{init_tracing, TelemetryConfig};
use tembang_api::{
    create_api_router, ApiConfig, ApiError, ApiResult, AppState, AuthConfig, DbClient, DbConfig,
    StoreKind,
};
use tembang_storage::{CatalogStore, InMemoryCatalogStore};

#[tokio::main]
async fn main() -> ApiResult<()> {
    let telemetry_config = TelemetryConfig::from_env();
    init_tracing(&telemetry_config)?;

    let api_config = ApiConfig::from_env()?;
    let auth_config = AuthConfig::from_env();
    auth_config.validate_for_production()?;

    let store: Arc<dyn CatalogStore> = match api_config.store {
        StoreKind::Postgres => {
            let db_config = DbConfig::from_env();
            let db = DbClient::from_config(&db_config)?;
            tracing::info!(
                host = %db_config.host,
                database = %db_config.dbname,
                pool_size = db.pool_size(),
                "PostgreSQL store configured"
            );
            Arc::new(db)
        }
        StoreKind::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on shutdown");
            Arc::new(InMemoryCatalogStore::new())
        }
    };

    let cache_layer = api_config.cache.open_layer().map_err(|e| {
        ApiError::internal_error(format!("Failed to open cache layer: {}", e))
    })?;
    tracing::info!(
        backend = cache_layer.name(),
        ttl_secs = api_config.cache.ttl.as_secs(),
        "Cache layer opened"
    );

    let state = AppState::new(
        store,
        cache_layer,
        api_config.cache.cache_config(),
        auth_config,
    );
    let app = create_api_router(state, &api_config);

    let addr = resolve_bind_addr()?;
    tracing::info!(%addr, "Starting Tembang API server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to bind {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::internal_error(format!("Server error: {}", e)))?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn resolve_bind_addr() -> ApiResult<SocketAddr> {
    let host = std::env::var("TEMBANG_API_BIND").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port_str = std::env::var("PORT")
        .ok()
        .or_else(|| std::env::var("TEMBANG_API_PORT").ok())
        .unwrap_or_else(|| "5000".to_string());
    let port = port_str
        .parse::<u16>()
        .map_err(|_| ApiError::invalid_input(format!("Invalid port value: {}", port_str)))?;

    let addr = format!("{}:{}", host, port);
    addr.parse::<SocketAddr>()
        .map_err(|e| ApiError::invalid_input(format!("Invalid bind address {}: {}", addr, e)))
}
