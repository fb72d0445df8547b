//! REST API Route Definitions
//!
//! Route modules per resource and the assembly of the application router:
//! - `/albums`, `/songs`, `/users`: public, except toggling a like
//! - `/playlists`, `/collaborations`: bearer authentication required
//! - `/health`: liveness and readiness, no authentication
//! - `/openapi.json` and `/swagger-ui`

pub mod album;
pub mod authentication;
pub mod collaboration;
pub mod health;
pub mod playlist;
pub mod song;
pub mod user;

use std::time::Duration;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;
use tembang_storage::CacheRead;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ApiConfig;
use crate::middleware::{auth_middleware, AuthMiddlewareState};
use crate::state::AppState;

#[cfg(not(feature = "swagger-ui"))]
use crate::openapi::ApiDoc;
#[cfg(not(feature = "swagger-ui"))]
use axum::routing::get;
#[cfg(not(feature = "swagger-ui"))]
use utoipa::OpenApi;

/// Response header marking a body that was served from the cache.
pub const DATA_SOURCE_HEADER: HeaderName = HeaderName::from_static("x-data-source");

/// JSON response for a read that may have been served from the cache.
pub fn cached_response<T: Serialize>(read: CacheRead<T>) -> Response {
    let from_cache = read.served_from_cache();
    let mut response = Json(read.into_value()).into_response();
    if from_cache {
        response
            .headers_mut()
            .insert(DATA_SOURCE_HEADER, HeaderValue::from_static("cache"));
    }
    response
}

/// Handler for /openapi.json when the Swagger UI does not serve it.
#[cfg(not(feature = "swagger-ui"))]
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Build CORS layer from configuration.
fn build_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([DATA_SOURCE_HEADER])
        .max_age(Duration::from_secs(config.cors_max_age_secs));

    if config.cors_origins.is_empty() {
        tracing::info!("CORS: Development mode - allowing all origins");
        cors.allow_origin(Any)
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS: allowing configured origins");
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Assemble the application router.
pub fn create_api_router(state: AppState, api_config: &ApiConfig) -> Router {
    let auth_state = AuthMiddlewareState::new(state.auth.clone());

    let protected = Router::new()
        .nest("/playlists", playlist::create_router(state.clone()))
        .nest("/collaborations", collaboration::create_router(state.clone()))
        .route_layer(from_fn_with_state(auth_state.clone(), auth_middleware));

    let router = Router::new()
        .nest("/albums", album::create_router(state.clone(), auth_state))
        .nest("/songs", song::create_router(state.clone()))
        .nest("/users", user::create_router(state.clone()))
        .nest("/authentications", authentication::create_router(state.clone()))
        .nest("/health", health::create_router(state))
        .merge(protected);

    #[cfg(feature = "swagger-ui")]
    let router = {
        use crate::openapi::ApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        router.merge(SwaggerUi::new("/swagger-ui").url("/openapi.json", ApiDoc::openapi()))
    };

    #[cfg(not(feature = "swagger-ui"))]
    let router = router.route("/openapi.json", get(openapi_json));

    router
        .layer(build_cors_layer(api_config))
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_cached_response_sets_header() {
        let response = cached_response(CacheRead::from_cache(vec![1, 2, 3]));
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[DATA_SOURCE_HEADER], "cache");
    }

    #[test]
    fn test_store_response_has_no_header() {
        let response = cached_response(CacheRead::from_store("fresh"));
        assert!(response.headers().get(DATA_SOURCE_HEADER).is_none());
    }

    #[test]
    fn test_cors_layer_builds_for_both_modes() {
        let _ = build_cors_layer(&ApiConfig::default());
        let _ = build_cors_layer(&ApiConfig {
            cors_origins: vec!["https://tembang.example".to_string()],
            ..ApiConfig::default()
        });
    }
}
