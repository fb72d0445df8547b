//! Tembang Storage
//!
//! The durable store abstraction ([`CatalogStore`]), an in-memory
//! implementation, and the cache layer with its cache-aside orchestrator.

pub mod cache;
pub mod memory;
pub mod store;

pub use cache::{
    CacheAside, CacheAsideStats, CacheConfig, CacheError, CacheKey, CacheLayer, CacheLookup,
    CacheRead, CacheStats, LmdbCacheBackend, MemoryCacheBackend, MissReason,
};
pub use memory::InMemoryCatalogStore;
pub use store::{CatalogStore, LikeToggleOutcome, UserCredential};
