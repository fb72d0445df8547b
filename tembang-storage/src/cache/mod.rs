//! Cache layer and cache-aside orchestration.
//!
//! The cache is an accelerator only. Absence of an entry never means the
//! entity does not exist, only that the value must be recomputed from the
//! durable store.
//!
//! # Example
//!
//! ```ignore
//! let cache = CacheAside::new(Arc::new(MemoryCacheBackend::new()), CacheConfig::default());
//!
//! let read = cache
//!     .fetch(&CacheKey::Album(id.clone()), || async { load_album(&id).await })
//!     .await?;
//! if read.served_from_cache() {
//!     tracing::debug!("served from cache");
//! }
//!
//! // After a write to the album:
//! cache.invalidate(&CacheKey::Album(id)).await;
//! ```

pub mod cache_aside;
pub mod key;
pub mod lmdb_backend;
pub mod memory_backend;
pub mod traits;

pub use cache_aside::{
    CacheAside, CacheAsideStats, CacheConfig, CacheLookup, CacheRead, MissReason,
    DEFAULT_ENTRY_TTL,
};
pub use key::CacheKey;
pub use lmdb_backend::LmdbCacheBackend;
pub use memory_backend::MemoryCacheBackend;
pub use traits::{CacheError, CacheLayer, CacheStats};
