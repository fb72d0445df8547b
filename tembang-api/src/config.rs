//! API Configuration Module
//!
//! CORS, store selection and cache settings. Configuration is loaded from
//! environment variables with development defaults.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tembang_core::ConfigError;
use tembang_storage::{
    CacheConfig, CacheError, CacheLayer, LmdbCacheBackend, MemoryCacheBackend,
};

// ============================================================================
// STORE SELECTION
// ============================================================================

/// Which durable store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreKind {
    /// PostgreSQL through the connection pool (default)
    #[default]
    Postgres,
    /// Process-local store, data is lost on restart
    Memory,
}

impl std::str::FromStr for StoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreKind::Postgres),
            "memory" => Ok(StoreKind::Memory),
            other => Err(ConfigError::InvalidValue {
                field: "TEMBANG_STORE".to_string(),
                value: other.to_string(),
                reason: "expected 'postgres' or 'memory'".to_string(),
            }),
        }
    }
}

// ============================================================================
// CACHE CONFIGURATION
// ============================================================================

/// Which cache layer implementation to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackendKind {
    #[default]
    Memory,
    Lmdb,
}

impl std::str::FromStr for CacheBackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(CacheBackendKind::Memory),
            "lmdb" => Ok(CacheBackendKind::Lmdb),
            other => Err(ConfigError::InvalidValue {
                field: "TEMBANG_CACHE_BACKEND".to_string(),
                value: other.to_string(),
                reason: "expected 'memory' or 'lmdb'".to_string(),
            }),
        }
    }
}

/// Cache layer settings.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub backend: CacheBackendKind,
    /// Directory for LMDB files.
    pub path: PathBuf,
    /// LMDB map size in megabytes.
    pub max_size_mb: usize,
    /// TTL applied to every cache entry.
    pub ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            backend: CacheBackendKind::Memory,
            path: PathBuf::from("./data/cache"),
            max_size_mb: 256,
            ttl: tembang_storage::cache::DEFAULT_ENTRY_TTL,
        }
    }
}

impl CacheSettings {
    /// Load cache settings from environment variables.
    ///
    /// - `TEMBANG_CACHE_BACKEND`: "memory" or "lmdb" (default: memory)
    /// - `TEMBANG_CACHE_PATH`: LMDB directory (default: ./data/cache)
    /// - `TEMBANG_CACHE_MAX_SIZE_MB`: LMDB map size (default: 256)
    /// - `TEMBANG_CACHE_TTL_SECS`: entry TTL (default: 1800)
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let backend = match std::env::var("TEMBANG_CACHE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) => defaults.backend,
        };

        Ok(Self {
            backend,
            path: std::env::var("TEMBANG_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.path),
            max_size_mb: std::env::var("TEMBANG_CACHE_MAX_SIZE_MB")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_size_mb),
            ttl: std::env::var("TEMBANG_CACHE_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.ttl),
        })
    }

    /// Open the configured cache layer.
    pub fn open_layer(&self) -> Result<Arc<dyn CacheLayer>, CacheError> {
        match self.backend {
            CacheBackendKind::Memory => Ok(Arc::new(MemoryCacheBackend::new())),
            CacheBackendKind::Lmdb => Ok(Arc::new(LmdbCacheBackend::new(
                &self.path,
                self.max_size_mb,
            )?)),
        }
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig::new().with_ttl(self.ttl)
    }
}

// ============================================================================
// API CONFIGURATION
// ============================================================================

/// API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Allowed CORS origins (comma-separated in env var).
    /// Empty means allow all origins (dev mode).
    pub cors_origins: Vec<String>,

    /// Max age for CORS preflight cache in seconds.
    pub cors_max_age_secs: u64,

    /// Durable store backing the service.
    pub store: StoreKind,

    /// Cache layer settings.
    pub cache: CacheSettings,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            cors_max_age_secs: 86400,
            store: StoreKind::Postgres,
            cache: CacheSettings::default(),
        }
    }
}

impl ApiConfig {
    /// Create ApiConfig from environment variables.
    ///
    /// Environment variables:
    /// - `TEMBANG_CORS_ORIGINS`: Comma-separated allowed origins (empty = allow all)
    /// - `TEMBANG_CORS_MAX_AGE_SECS`: Preflight cache duration (default: 86400)
    /// - `TEMBANG_STORE`: "postgres" or "memory" (default: postgres)
    /// - plus the cache variables read by [`CacheSettings::from_env`]
    pub fn from_env() -> Result<Self, ConfigError> {
        let cors_origins = std::env::var("TEMBANG_CORS_ORIGINS")
            .ok()
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let cors_max_age_secs = std::env::var("TEMBANG_CORS_MAX_AGE_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(86400);

        let store = match std::env::var("TEMBANG_STORE") {
            Ok(value) => value.parse()?,
            Err(_) => StoreKind::default(),
        };

        Ok(Self {
            cors_origins,
            cors_max_age_secs,
            store,
            cache: CacheSettings::from_env()?,
        })
    }

    /// Check if running in production mode (strict CORS).
    pub fn is_production(&self) -> bool {
        !self.cors_origins.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.cors_max_age_secs, 86400);
        assert_eq!(config.store, StoreKind::Postgres);
        assert_eq!(config.cache.backend, CacheBackendKind::Memory);
        assert_eq!(config.cache.ttl, Duration::from_secs(1800));
        assert!(!config.is_production());
    }

    #[test]
    fn test_parse_kinds() {
        assert_eq!("LMDB".parse::<CacheBackendKind>(), Ok(CacheBackendKind::Lmdb));
        assert_eq!("memory".parse::<StoreKind>(), Ok(StoreKind::Memory));
        assert!("redis".parse::<CacheBackendKind>().is_err());
        assert!("sqlite".parse::<StoreKind>().is_err());
    }

    #[test]
    fn test_open_lmdb_layer() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = CacheSettings {
            backend: CacheBackendKind::Lmdb,
            path: dir.path().join("cache"),
            max_size_mb: 8,
            ttl: Duration::from_secs(5),
        };
        let layer = settings.open_layer().unwrap();
        assert_eq!(layer.name(), "lmdb");
        assert_eq!(settings.cache_config().entry_ttl, Duration::from_secs(5));
    }
}
