//! Shared application state for Axum routers.

use std::sync::Arc;

use tembang_storage::{CacheAside, CacheConfig, CacheLayer, CatalogStore};

use crate::auth::AuthConfig;
use crate::cached_db::CachedCatalog;
use crate::services::{LikeToggleMutator, PlaylistAccessResolver};

/// Application-wide state shared across all routes.
///
/// Built once at startup. Every component holds the same store and cache
/// handles.
#[derive(Clone)]
pub struct AppState {
    /// Durable store, for operations that bypass the cache.
    pub store: Arc<dyn CatalogStore>,
    /// Album, song and like reads through the cache.
    pub catalog: CachedCatalog,
    pub access: PlaylistAccessResolver,
    pub likes: LikeToggleMutator,
    pub auth: Arc<AuthConfig>,
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        cache_layer: Arc<dyn CacheLayer>,
        cache_config: CacheConfig,
        auth: AuthConfig,
    ) -> Self {
        let cache = Arc::new(CacheAside::new(cache_layer, cache_config));
        let catalog = CachedCatalog::new(Arc::clone(&store), cache);
        Self {
            access: PlaylistAccessResolver::new(Arc::clone(&store)),
            likes: LikeToggleMutator::new(catalog.clone()),
            catalog,
            store,
            auth: Arc::new(auth),
            start_time: std::time::Instant::now(),
        }
    }

    pub fn cache(&self) -> &Arc<CacheAside> {
        self.catalog.cache()
    }
}

crate::impl_from_ref!(Arc<dyn CatalogStore>, store);
crate::impl_from_ref!(CachedCatalog, catalog);
crate::impl_from_ref!(PlaylistAccessResolver, access);
crate::impl_from_ref!(LikeToggleMutator, likes);
crate::impl_from_ref!(Arc<AuthConfig>, auth);
crate::impl_from_ref!(std::time::Instant, start_time);
