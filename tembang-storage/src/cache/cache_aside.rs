//! Cache-aside orchestration.
//!
//! Reads go cache-first and fall back to a loader against the durable store,
//! populating the cache on the way out. Writes go to the store and then call
//! [`CacheAside::invalidate`] for every key whose query result they changed.
//!
//! Cache failures never reach the caller. An absent key, an expired entry, a
//! backend error and an undecodable payload are all the same outcome from the
//! caller's point of view: a miss. [`CacheLookup`] keeps the distinction for
//! logs and statistics only.
//!
//! There is no locking between a reader's miss-fill and a writer's
//! invalidation. A fill that lands after a concurrent invalidation keeps the
//! old value alive until its TTL runs out.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tembang_core::TembangResult;

use super::key::CacheKey;
use super::traits::{CacheError, CacheLayer, CacheStats};

/// Default entry lifetime: 30 minutes.
pub const DEFAULT_ENTRY_TTL: Duration = Duration::from_secs(1800);

/// Configuration for the cache-aside orchestrator.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL applied to every populated entry.
    pub entry_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            entry_ttl: DEFAULT_ENTRY_TTL,
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the entry TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.entry_ttl = ttl;
        self
    }
}

/// Why a lookup did not produce a usable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// No entry, or the entry expired.
    Absent,
    /// The cache layer returned an error.
    Backend,
    /// An entry exists but does not decode as the requested type.
    Undecodable,
}

/// Outcome of reading one key from the cache layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup<T> {
    Hit(T),
    Miss(MissReason),
}

impl<T> CacheLookup<T> {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheLookup::Hit(_))
    }

    pub fn into_hit(self) -> Option<T> {
        match self {
            CacheLookup::Hit(value) => Some(value),
            CacheLookup::Miss(_) => None,
        }
    }
}

/// A value together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheRead<T> {
    value: T,
    served_from_cache: bool,
}

impl<T> CacheRead<T> {
    /// A value served from the cache.
    pub fn from_cache(value: T) -> Self {
        Self {
            value,
            served_from_cache: true,
        }
    }

    /// A value loaded from the durable store.
    pub fn from_store(value: T) -> Self {
        Self {
            value,
            served_from_cache: false,
        }
    }

    pub fn served_from_cache(&self) -> bool {
        self.served_from_cache
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (T, bool) {
        (self.value, self.served_from_cache)
    }

    /// Transform the value, keeping its provenance.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> CacheRead<U> {
        CacheRead {
            value: f(self.value),
            served_from_cache: self.served_from_cache,
        }
    }
}

/// Decision counters kept by the orchestrator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheAsideStats {
    pub hits: u64,
    pub misses_absent: u64,
    pub misses_backend: u64,
    pub misses_undecodable: u64,
    pub populate_failures: u64,
    pub invalidate_failures: u64,
}

impl CacheAsideStats {
    pub fn misses(&self) -> u64 {
        self.misses_absent + self.misses_backend + self.misses_undecodable
    }

    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses_absent: AtomicU64,
    misses_backend: AtomicU64,
    misses_undecodable: AtomicU64,
    populate_failures: AtomicU64,
    invalidate_failures: AtomicU64,
}

/// Cache-aside orchestrator over a shared cache layer.
pub struct CacheAside {
    layer: Arc<dyn CacheLayer>,
    config: CacheConfig,
    counters: Counters,
}

impl std::fmt::Debug for CacheAside {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAside")
            .field("layer", &self.layer.name())
            .field("config", &self.config)
            .finish()
    }
}

impl CacheAside {
    pub fn new(layer: Arc<dyn CacheLayer>, config: CacheConfig) -> Self {
        Self {
            layer,
            config,
            counters: Counters::default(),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn layer_name(&self) -> &'static str {
        self.layer.name()
    }

    /// Read `key` from the cache layer, classifying every failure as a miss.
    pub async fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> CacheLookup<T> {
        let rendered = key.render();
        let lookup = match self.layer.get(&rendered).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<T>(&bytes) {
                Ok(value) => CacheLookup::Hit(value),
                Err(e) => {
                    tracing::warn!(key = %rendered, error = %e, "Discarding undecodable cache entry");
                    CacheLookup::Miss(MissReason::Undecodable)
                }
            },
            Ok(None) => CacheLookup::Miss(MissReason::Absent),
            Err(e) => {
                tracing::warn!(
                    key = %rendered,
                    backend = self.layer.name(),
                    error = %e,
                    "Cache read failed, treating as miss"
                );
                CacheLookup::Miss(MissReason::Backend)
            }
        };
        self.record(&lookup);
        lookup
    }

    /// Serve `key` from the cache, or run `loader` and populate the cache.
    ///
    /// Loader errors propagate unchanged and nothing is cached for them.
    pub async fn fetch<T, F, Fut>(&self, key: &CacheKey, loader: F) -> TembangResult<CacheRead<T>>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = TembangResult<T>> + Send,
    {
        match self.lookup::<T>(key).await {
            CacheLookup::Hit(value) => {
                tracing::debug!(key = %key, "Cache hit");
                return Ok(CacheRead::from_cache(value));
            }
            CacheLookup::Miss(reason) => {
                tracing::debug!(key = %key, ?reason, "Cache miss");
            }
        }

        let value = loader().await?;
        self.populate(key, &value).await;
        Ok(CacheRead::from_store(value))
    }

    /// Write `value` under `key`. Failures are logged and swallowed.
    pub async fn populate<T: Serialize>(&self, key: &CacheKey, value: &T) {
        let rendered = key.render();
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.counters.populate_failures.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(key = %rendered, error = %e, "Failed to serialize cache entry");
                return;
            }
        };
        if let Err(e) = self.layer.set(&rendered, bytes, self.config.entry_ttl).await {
            self.counters.populate_failures.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                key = %rendered,
                backend = self.layer.name(),
                error = %e,
                "Failed to populate cache entry"
            );
        }
    }

    /// Delete `key` from the cache layer.
    ///
    /// Succeeds whether or not the key was present. A cache-layer failure is
    /// logged at error level and not returned: the durable write has already
    /// happened and the entry will age out with its TTL.
    pub async fn invalidate(&self, key: &CacheKey) {
        let rendered = key.render();
        match self.layer.delete(&rendered).await {
            Ok(()) => tracing::debug!(key = %rendered, "Cache entry invalidated"),
            Err(e) => {
                self.counters.invalidate_failures.fetch_add(1, Ordering::Relaxed);
                tracing::error!(
                    key = %rendered,
                    backend = self.layer.name(),
                    error = %e,
                    "Cache invalidation failed, entry may be stale until TTL expiry"
                );
            }
        }
    }

    /// Invalidate several keys in order.
    pub async fn invalidate_all<I>(&self, keys: I)
    where
        I: IntoIterator<Item = CacheKey> + Send,
        I::IntoIter: Send,
    {
        for key in keys {
            self.invalidate(&key).await;
        }
    }

    /// Orchestrator decision counters.
    pub fn stats(&self) -> CacheAsideStats {
        CacheAsideStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses_absent: self.counters.misses_absent.load(Ordering::Relaxed),
            misses_backend: self.counters.misses_backend.load(Ordering::Relaxed),
            misses_undecodable: self.counters.misses_undecodable.load(Ordering::Relaxed),
            populate_failures: self.counters.populate_failures.load(Ordering::Relaxed),
            invalidate_failures: self.counters.invalidate_failures.load(Ordering::Relaxed),
        }
    }

    /// Statistics reported by the underlying cache layer.
    pub async fn layer_stats(&self) -> Result<CacheStats, CacheError> {
        self.layer.stats().await
    }

    fn record<T>(&self, lookup: &CacheLookup<T>) {
        let counter = match lookup {
            CacheLookup::Hit(_) => &self.counters.hits,
            CacheLookup::Miss(MissReason::Absent) => &self.counters.misses_absent,
            CacheLookup::Miss(MissReason::Backend) => &self.counters.misses_backend,
            CacheLookup::Miss(MissReason::Undecodable) => &self.counters.misses_undecodable,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}
