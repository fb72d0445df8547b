//! Health Check Endpoints
//!
//! - /health/ping - Simple liveness check
//! - /health/live - Process alive check
//! - /health/ready - Store connectivity plus cache statistics
//!
//! No authentication required for health endpoints. A failing cache only
//! degrades readiness since every read falls back to the store.

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tembang_core::{HealthCheck, HealthStatus};
use tembang_storage::{CacheAside, CatalogStore};

use crate::state::AppState;

// ============================================================================
// TYPES
// ============================================================================

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HealthDetails>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthDetails {
    pub store: HealthCheck,
    pub cache: HealthCheck,
    pub version: String,
    pub uptime_seconds: u64,
}

// ============================================================================
// HANDLERS
// ============================================================================

/// GET /health/ping - Simple pong response
#[utoipa::path(
    get,
    path = "/health/ping",
    tag = "Health",
    responses(
        (status = 200, description = "Service is responding", body = String),
    ),
)]
pub async fn ping() -> impl IntoResponse {
    (StatusCode::OK, "pong")
}

/// GET /health/live - Process liveness check
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "Health",
    responses(
        (status = 200, description = "Process is alive", body = HealthResponse),
    ),
)]
pub async fn liveness() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        message: Some("Process is alive".to_string()),
        details: None,
    };
    (StatusCode::OK, Json(response))
}

/// GET /health/ready - Readiness check
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "Health",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse),
        (status = 503, description = "Store is unreachable", body = HealthResponse),
    ),
)]
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let store_health = check_store(state.store.as_ref()).await;
    let cache_health = check_cache(state.cache()).await;
    let overall = store_health.status.worst(cache_health.status);

    let response = HealthResponse {
        status: overall,
        message: None,
        details: Some(HealthDetails {
            store: store_health,
            cache: cache_health,
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.start_time.elapsed().as_secs(),
        }),
    };

    let status_code = if overall == HealthStatus::Unhealthy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (status_code, Json(response))
}

async fn check_store(store: &dyn CatalogStore) -> HealthCheck {
    let start = Instant::now();
    match store.ping().await {
        Ok(()) => HealthCheck::healthy("store")
            .with_response_time(start.elapsed().as_millis() as u64),
        Err(e) => {
            tracing::error!(error = %e, "Store readiness check failed");
            HealthCheck::unhealthy("store", "Store check failed")
        }
    }
}

async fn check_cache(cache: &CacheAside) -> HealthCheck {
    let orchestrator = cache.stats();
    let check = match cache.layer_stats().await {
        Ok(layer) => HealthCheck::healthy("cache")
            .with_metadata("entries", layer.entry_count.into())
            .with_metadata("memory_bytes", layer.memory_bytes.into())
            .with_metadata("evictions", layer.evictions.into()),
        Err(e) => {
            tracing::warn!(error = %e, "Cache layer statistics unavailable");
            HealthCheck::degraded("cache", "Cache layer unavailable, reads go to the store")
        }
    };
    check
        .with_metadata("backend", cache.layer_name().into())
        .with_metadata("hits", orchestrator.hits.into())
        .with_metadata("misses", orchestrator.misses().into())
        .with_metadata("populate_failures", orchestrator.populate_failures.into())
        .with_metadata("invalidate_failures", orchestrator.invalidate_failures.into())
}

// ============================================================================
// ROUTER
// ============================================================================

/// Create health check router (no auth required)
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/live", get(liveness))
        .route("/ready", get(readiness))
        .with_state(state)
}
