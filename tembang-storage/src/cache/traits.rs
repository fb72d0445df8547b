//! Cache layer trait and statistics.
//!
//! A cache layer is a byte-oriented key/value store with per-key TTL. It
//! makes no durability promise; callers treat its contents as advisory.

use std::time::Duration;

use async_trait::async_trait;

/// Errors raised by cache layer implementations.
///
/// These never cross the cache-aside boundary: the orchestrator logs them and
/// degrades to a miss.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Failed to open or create the backing environment.
    #[error("Failed to open cache environment: {0}")]
    EnvOpen(String),

    /// Failed to open the database within the environment.
    #[error("Failed to open cache database: {0}")]
    DbOpen(String),

    /// Read or write transaction failed.
    #[error("Cache transaction error: {0}")]
    Transaction(String),

    /// Stored bytes do not follow the entry layout.
    #[error("Corrupt cache entry for {key}: {reason}")]
    Corrupt { key: String, reason: String },

    /// The backend refused the operation.
    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Pluggable cache backend.
///
/// Implementations must be safe for concurrent use. An expired entry is
/// reported as absent.
#[async_trait]
pub trait CacheLayer: Send + Sync {
    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;

    /// Read the bytes stored under `key`, or `None` when absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store `value` under `key` for `ttl`.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<(), CacheError>;

    /// Remove `key`. Removing an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Usage statistics.
    async fn stats(&self) -> Result<CacheStats, CacheError>;
}

/// Statistics about cache usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of reads that found a live entry.
    pub hits: u64,
    /// Number of reads that found nothing usable.
    pub misses: u64,
    /// Number of entries currently stored (may include expired entries not
    /// yet reclaimed).
    pub entry_count: u64,
    /// Approximate payload size in bytes.
    pub memory_bytes: u64,
    /// Number of entries dropped because they expired.
    pub evictions: u64,
}

impl CacheStats {
    /// Calculate the hit rate (0.0 to 1.0).
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_empty() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_ratio() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..Default::default()
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }
}
