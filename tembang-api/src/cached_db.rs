//! Cached Catalog Client
//!
//! Wraps a [`CatalogStore`] with the cache-aside orchestrator. Reads of
//! albums, album songs and like counts go through [`CacheAside::fetch`];
//! every write lands in the store first and then invalidates exactly the
//! keys whose query result it can change:
//!
//! | Write              | Keys invalidated                                   |
//! |--------------------|----------------------------------------------------|
//! | add album          | `albums:list`                                      |
//! | edit album / cover | `albums:list`, `album:<id>`                        |
//! | delete album       | `albums:list`, `album:<id>`, `album-songs:<id>`, `likes:<id>` |
//! | add/delete song    | `album-songs:<albumId>`                            |
//! | edit song          | `album-songs:<old>`, `album-songs:<new>`           |
//! | toggle like        | `likes:<albumId>`                                  |

use std::sync::Arc;

use tembang_core::{
    Album, AlbumId, AlbumInput, EntityType, Song, SongId, SongInput, SongQuery, SongSummary,
    TembangError, TembangResult,
};
use tembang_storage::{CacheAside, CacheKey, CacheRead, CatalogStore, LikeToggleOutcome};

use crate::types::AlbumDetail;

/// Catalog operations with transparent caching of album reads.
#[derive(Clone)]
pub struct CachedCatalog {
    store: Arc<dyn CatalogStore>,
    cache: Arc<CacheAside>,
}

impl std::fmt::Debug for CachedCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedCatalog")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

fn album_not_found() -> TembangError {
    TembangError::not_found(EntityType::Album, "Album not found")
}

fn song_not_found() -> TembangError {
    TembangError::not_found(EntityType::Song, "Song not found")
}

impl CachedCatalog {
    pub fn new(store: Arc<dyn CatalogStore>, cache: Arc<CacheAside>) -> Self {
        Self { store, cache }
    }

    /// The underlying durable store.
    pub fn store(&self) -> &Arc<dyn CatalogStore> {
        &self.store
    }

    /// The cache-aside orchestrator.
    pub fn cache(&self) -> &Arc<CacheAside> {
        &self.cache
    }

    // ========================================================================
    // ALBUM OPERATIONS
    // ========================================================================

    pub async fn album_add(&self, input: AlbumInput) -> TembangResult<AlbumId> {
        let album = Album {
            id: AlbumId::new(),
            name: input.name,
            year: input.year,
            cover_url: None,
        };
        self.store.album_insert(&album).await?;
        self.cache.invalidate(&CacheKey::AlbumList).await;
        tracing::info!(album_id = %album.id, "Album added");
        Ok(album.id)
    }

    pub async fn albums(&self) -> TembangResult<CacheRead<Vec<Album>>> {
        let store = Arc::clone(&self.store);
        self.cache
            .fetch(&CacheKey::AlbumList, move || async move { store.album_list().await })
            .await
    }

    /// A single album. `NotFound` is never cached.
    pub async fn album(&self, id: &AlbumId) -> TembangResult<CacheRead<Album>> {
        let store = Arc::clone(&self.store);
        let album_id = id.clone();
        self.cache
            .fetch(&CacheKey::Album(id.clone()), move || async move {
                store.album_get(&album_id).await?.ok_or_else(album_not_found)
            })
            .await
    }

    /// Songs whose album reference is `id`. Does not check the album exists.
    pub async fn album_songs(&self, id: &AlbumId) -> TembangResult<CacheRead<Vec<SongSummary>>> {
        let store = Arc::clone(&self.store);
        let album_id = id.clone();
        self.cache
            .fetch(&CacheKey::AlbumSongs(id.clone()), move || async move {
                store.songs_by_album(&album_id).await
            })
            .await
    }

    /// Album with its songs. The album is resolved first so a missing album
    /// never leaves a songs entry behind in the cache.
    pub async fn album_detail(&self, id: &AlbumId) -> TembangResult<CacheRead<AlbumDetail>> {
        let (album, album_cached) = self.album(id).await?.into_parts();
        let (songs, songs_cached) = self.album_songs(id).await?.into_parts();
        let detail = AlbumDetail { album, songs };
        Ok(if album_cached && songs_cached {
            CacheRead::from_cache(detail)
        } else {
            CacheRead::from_store(detail)
        })
    }

    pub async fn album_edit(&self, id: &AlbumId, input: &AlbumInput) -> TembangResult<()> {
        if !self.store.album_update(id, input).await? {
            return Err(album_not_found());
        }
        self.cache
            .invalidate_all([CacheKey::Album(id.clone()), CacheKey::AlbumList])
            .await;
        Ok(())
    }

    pub async fn album_remove(&self, id: &AlbumId) -> TembangResult<()> {
        if !self.store.album_delete(id).await? {
            return Err(album_not_found());
        }
        self.cache.invalidate_all(CacheKey::album_scope(id)).await;
        tracing::info!(album_id = %id, "Album deleted");
        Ok(())
    }

    /// Record the cover URL. A missing album is an `Invariant`, not
    /// `NotFound`: the upload has already happened by the time this runs.
    pub async fn album_set_cover(&self, id: &AlbumId, cover_url: &str) -> TembangResult<()> {
        if !self.store.album_set_cover(id, cover_url).await? {
            return Err(TembangError::invariant("Failed to add album cover"));
        }
        self.cache
            .invalidate_all([CacheKey::Album(id.clone()), CacheKey::AlbumList])
            .await;
        Ok(())
    }

    // ========================================================================
    // LIKE OPERATIONS
    // ========================================================================

    /// Flip the like row for the pair in the store. Callers own the
    /// `likes:<id>` invalidation.
    pub(crate) async fn like_toggle_raw(
        &self,
        album_id: &AlbumId,
        user_id: &tembang_core::UserId,
    ) -> TembangResult<LikeToggleOutcome> {
        self.store.like_toggle(album_id, user_id).await
    }

    /// Number of users who like the album.
    pub async fn like_count(&self, album_id: &AlbumId) -> TembangResult<CacheRead<u64>> {
        let store = Arc::clone(&self.store);
        let id = album_id.clone();
        self.cache
            .fetch(&CacheKey::AlbumLikes(album_id.clone()), move || async move {
                let users = store.likes_by_album(&id).await?;
                Ok(users.len() as u64)
            })
            .await
    }

    // ========================================================================
    // SONG OPERATIONS
    // ========================================================================

    pub async fn song_add(&self, input: SongInput) -> TembangResult<SongId> {
        let song = Song {
            id: SongId::new(),
            title: input.title,
            year: input.year,
            performer: input.performer,
            genre: input.genre,
            duration: input.duration,
            album_id: input.album_id,
        };
        self.store.song_insert(&song).await?;
        if let Some(album_id) = &song.album_id {
            self.cache.invalidate(&CacheKey::AlbumSongs(album_id.clone())).await;
        }
        Ok(song.id)
    }

    /// Songs matching the filter. An empty result is `NotFound`.
    pub async fn songs(&self, query: &SongQuery) -> TembangResult<Vec<SongSummary>> {
        let songs = self.store.song_list(query).await?;
        if songs.is_empty() {
            return Err(TembangError::not_found(EntityType::Song, "Songs not found"));
        }
        Ok(songs)
    }

    pub async fn song(&self, id: &SongId) -> TembangResult<Song> {
        self.store.song_get(id).await?.ok_or_else(song_not_found)
    }

    pub async fn song_edit(&self, id: &SongId, input: &SongInput) -> TembangResult<()> {
        let previous = self
            .store
            .song_update(id, input)
            .await?
            .ok_or_else(song_not_found)?;

        let mut keys = Vec::with_capacity(2);
        if let Some(old) = previous.album_id {
            keys.push(CacheKey::AlbumSongs(old));
        }
        if let Some(new) = &input.album_id {
            let key = CacheKey::AlbumSongs(new.clone());
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
        self.cache.invalidate_all(keys).await;
        Ok(())
    }

    pub async fn song_remove(&self, id: &SongId) -> TembangResult<()> {
        let removed = self.store.song_delete(id).await?.ok_or_else(song_not_found)?;
        if let Some(album_id) = removed.album_id {
            self.cache.invalidate(&CacheKey::AlbumSongs(album_id)).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tembang_storage::{CacheConfig, InMemoryCatalogStore, MemoryCacheBackend};

    fn catalog() -> CachedCatalog {
        let cache = CacheAside::new(Arc::new(MemoryCacheBackend::new()), CacheConfig::default());
        CachedCatalog::new(Arc::new(InMemoryCatalogStore::new()), Arc::new(cache))
    }

    fn viva() -> AlbumInput {
        AlbumInput {
            name: "Viva la Vida".into(),
            year: 2008,
        }
    }

    fn song_on(album_id: Option<AlbumId>) -> SongInput {
        SongInput {
            title: "Lost!".into(),
            year: 2008,
            performer: "Coldplay".into(),
            genre: Some("Rock".into()),
            duration: Some(235),
            album_id,
        }
    }

    #[tokio::test]
    async fn test_second_album_read_is_cached() {
        let catalog = catalog();
        let id = catalog.album_add(viva()).await.unwrap();

        let first = catalog.album(&id).await.unwrap();
        let second = catalog.album(&id).await.unwrap();
        assert!(!first.served_from_cache());
        assert!(second.served_from_cache());
        assert_eq!(first.value(), second.value());
    }

    #[tokio::test]
    async fn test_edit_refreshes_album_and_list() {
        let catalog = catalog();
        let id = catalog.album_add(viva()).await.unwrap();
        catalog.albums().await.unwrap();
        catalog.album(&id).await.unwrap();

        let edited = AlbumInput {
            name: "Viva".into(),
            year: 2009,
        };
        catalog.album_edit(&id, &edited).await.unwrap();

        let album = catalog.album(&id).await.unwrap();
        assert!(!album.served_from_cache());
        assert_eq!(album.value().year, 2009);

        let list = catalog.albums().await.unwrap();
        assert!(!list.served_from_cache());
        assert_eq!(list.value()[0].name, "Viva");
    }

    #[tokio::test]
    async fn test_missing_album_is_not_found_and_not_cached() {
        let catalog = catalog();
        let id = AlbumId::from("album-missing");
        assert!(catalog.album(&id).await.unwrap_err().is_not_found());
        assert!(catalog.album_detail(&id).await.unwrap_err().is_not_found());
        assert_eq!(catalog.cache().stats().hits, 0);
    }

    #[tokio::test]
    async fn test_song_edit_invalidates_old_and_new_album() {
        let catalog = catalog();
        let a = catalog.album_add(viva()).await.unwrap();
        let b = catalog
            .album_add(AlbumInput {
                name: "Parachutes".into(),
                year: 2000,
            })
            .await
            .unwrap();
        let song = catalog.song_add(song_on(Some(a.clone()))).await.unwrap();

        assert_eq!(catalog.album_songs(&a).await.unwrap().value().len(), 1);
        assert_eq!(catalog.album_songs(&b).await.unwrap().value().len(), 0);

        catalog.song_edit(&song, &song_on(Some(b.clone()))).await.unwrap();

        let on_a = catalog.album_songs(&a).await.unwrap();
        let on_b = catalog.album_songs(&b).await.unwrap();
        assert!(!on_a.served_from_cache());
        assert!(!on_b.served_from_cache());
        assert!(on_a.value().is_empty());
        assert_eq!(on_b.value()[0].id, song);
    }

    #[tokio::test]
    async fn test_song_add_and_remove_refresh_album_songs() {
        let catalog = catalog();
        let album = catalog.album_add(viva()).await.unwrap();
        assert!(catalog.album_songs(&album).await.unwrap().value().is_empty());

        let song = catalog.song_add(song_on(Some(album.clone()))).await.unwrap();
        assert_eq!(catalog.album_songs(&album).await.unwrap().value().len(), 1);

        catalog.song_remove(&song).await.unwrap();
        assert!(catalog.album_songs(&album).await.unwrap().value().is_empty());
    }

    #[tokio::test]
    async fn test_album_delete_clears_scope() {
        let catalog = catalog();
        let id = catalog.album_add(viva()).await.unwrap();
        catalog.album_detail(&id).await.unwrap();
        catalog.like_count(&id).await.unwrap();

        catalog.album_remove(&id).await.unwrap();

        assert!(catalog.album(&id).await.unwrap_err().is_not_found());
        assert!(catalog.albums().await.unwrap().value().is_empty());
        assert!(catalog.album_remove(&id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_cover_on_missing_album_is_invariant() {
        let catalog = catalog();
        let err = catalog
            .album_set_cover(&AlbumId::from("album-x"), "http://cdn/cover.png")
            .await
            .unwrap_err();
        assert!(err.is_invariant());
    }

    #[tokio::test]
    async fn test_empty_song_search_is_not_found() {
        let catalog = catalog();
        catalog.song_add(song_on(None)).await.unwrap();

        let hit = SongQuery {
            title: Some("lost".into()),
            performer: None,
        };
        assert_eq!(catalog.songs(&hit).await.unwrap().len(), 1);

        let miss = SongQuery {
            title: Some("yellow".into()),
            performer: None,
        };
        assert!(catalog.songs(&miss).await.unwrap_err().is_not_found());
    }
}
