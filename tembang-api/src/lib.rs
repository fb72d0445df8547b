//! Tembang API - HTTP layer for the Tembang catalog service
//!
//! Albums, songs, users, login, collaborative playlists and album likes
//! over a JSON REST API (Axum). Reads of albums, album songs and like counts go
//! through a cache-aside layer in front of PostgreSQL.

pub mod auth;
pub mod cached_db;
pub mod config;
pub mod db;
pub mod error;
pub mod macros;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod types;

// Re-export commonly used types
pub use auth::{
    authenticate_jwt, generate_jwt_token, generate_refresh_token, hash_password,
    validate_jwt_token, validate_refresh_token, verify_password, AuthConfig, AuthContext, Claims,
};
pub use cached_db::CachedCatalog;
pub use config::{ApiConfig, CacheBackendKind, CacheSettings, StoreKind};
pub use db::{DbClient, DbConfig};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use middleware::{auth_middleware, AuthExtractor, AuthMiddlewareState};
pub use openapi::ApiDoc;
pub use routes::create_api_router;
pub use services::{
    AccessDecision, AccessGrant, DenialReason, LikeToggleMutator, PlaylistAccessResolver,
    TokenPair,
};
pub use state::AppState;
pub use types::*;
