//! Tembang Test Utilities
//!
//! Shared test infrastructure for the Tembang workspace:
//! - Proptest generators for ids, entities and cache keys
//! - Fixtures for common catalog scenarios
//! - Cache layer and store doubles that fail on demand
//! - A harness wiring the in-memory store to a cache-aside orchestrator
//! - Assertions on the domain error taxonomy

// Re-export core types for convenience
pub use tembang_core::{
    Album, AlbumId, AlbumInput, Collaboration, CollaborationId, EntityIdType, Playlist, PlaylistId,
    Song, SongId, SongInput, TembangError, TembangResult, User, UserId,
};
pub use tembang_storage::{
    CacheAside, CacheConfig, CacheError, CacheKey, CacheLayer, CacheStats, CatalogStore,
    InMemoryCatalogStore, MemoryCacheBackend,
};

// ============================================================================
// GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies.

    use super::*;
    use proptest::prelude::*;

    /// Suffixes stay short so collisions between generated ids are likely,
    /// which is what the relationship properties want to exercise.
    fn arb_suffix() -> impl Strategy<Value = String> {
        "[a-z0-9]{1,4}"
    }

    pub fn arb_album_id() -> impl Strategy<Value = AlbumId> {
        arb_suffix().prop_map(|s| AlbumId::from_string(format!("album-{}", s)))
    }

    pub fn arb_user_id() -> impl Strategy<Value = UserId> {
        arb_suffix().prop_map(|s| UserId::from_string(format!("user-{}", s)))
    }

    pub fn arb_playlist_id() -> impl Strategy<Value = PlaylistId> {
        arb_suffix().prop_map(|s| PlaylistId::from_string(format!("playlist-{}", s)))
    }

    pub fn arb_album(id: AlbumId) -> impl Strategy<Value = Album> {
        ("[A-Za-z ]{1,24}", 1950i32..2030, proptest::option::of("https://[a-z]{3,8}\\.test/[a-z]{4}\\.png"))
            .prop_map(move |(name, year, cover_url)| Album {
                id: id.clone(),
                name,
                year,
                cover_url,
            })
    }

    pub fn arb_song_input() -> impl Strategy<Value = SongInput> {
        (
            "[A-Za-z ]{1,24}",
            1950i32..2030,
            "[A-Za-z ]{1,16}",
            proptest::option::of("[a-z]{3,8}"),
            proptest::option::of(60i32..600),
        )
            .prop_map(|(title, year, performer, genre, duration)| SongInput {
                title,
                year,
                performer,
                genre,
                duration,
                album_id: None,
            })
    }

    /// Any key the cache-aside layer can be asked about.
    pub fn arb_cache_key() -> impl Strategy<Value = CacheKey> {
        prop_oneof![
            Just(CacheKey::AlbumList),
            arb_album_id().prop_map(CacheKey::Album),
            arb_album_id().prop_map(CacheKey::AlbumSongs),
            arb_album_id().prop_map(CacheKey::AlbumLikes),
        ]
    }

    /// How a user relates to a playlist.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Membership {
        Owner,
        Collaborator,
        Stranger,
        /// The playlist does not exist. The user may collaborate on others.
        MissingPlaylist,
    }

    pub fn arb_membership() -> impl Strategy<Value = Membership> {
        prop_oneof![
            Just(Membership::Owner),
            Just(Membership::Collaborator),
            Just(Membership::Stranger),
            Just(Membership::MissingPlaylist),
        ]
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built entities with readable ids.

    use super::*;

    pub fn album(id: &str, name: &str, year: i32) -> Album {
        Album {
            id: AlbumId::from(id),
            name: name.to_string(),
            year,
            cover_url: None,
        }
    }

    pub fn song(id: &str, title: &str, performer: &str, album_id: Option<&str>) -> Song {
        Song {
            id: SongId::from(id),
            title: title.to_string(),
            year: 2008,
            performer: performer.to_string(),
            genre: Some("pop".to_string()),
            duration: Some(240),
            album_id: album_id.map(AlbumId::from),
        }
    }

    /// Stored in place of a real hash for seeded users. It is not a PHC
    /// string, so no password ever matches it.
    pub const UNUSABLE_PASSWORD_HASH: &str = "!";

    pub fn user(id: &str, username: &str) -> User {
        User {
            id: UserId::from(id),
            username: username.to_string(),
            fullname: format!("{} fullname", username),
        }
    }

    pub fn playlist(id: &str, name: &str, owner: &str) -> Playlist {
        Playlist {
            id: PlaylistId::from(id),
            name: name.to_string(),
            owner: UserId::from(owner),
        }
    }

    pub fn collaboration(playlist_id: &str, user_id: &str) -> Collaboration {
        Collaboration {
            id: CollaborationId::new(),
            playlist_id: PlaylistId::from(playlist_id),
            user_id: UserId::from(user_id),
        }
    }
}

// ============================================================================
// TEST DOUBLES
// ============================================================================

pub mod doubles {
    //! Cache layer and store doubles.

    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tembang_core::{
        Activity, ActivityView, PlaylistSongId, PlaylistSummary, SongQuery, SongSummary,
        StorageError,
    };
    use tembang_storage::{LikeToggleOutcome, UserCredential};

    /// Cache layer that fails the selected operations and otherwise
    /// behaves as an empty cache.
    #[derive(Debug, Default)]
    pub struct FailingCache {
        fail_reads: bool,
        fail_writes: bool,
        fail_deletes: bool,
        calls: AtomicU64,
    }

    impl FailingCache {
        /// Every operation fails.
        pub fn unavailable() -> Self {
            Self {
                fail_reads: true,
                fail_writes: true,
                fail_deletes: true,
                calls: AtomicU64::new(0),
            }
        }

        /// Only deletes fail.
        pub fn failing_deletes() -> Self {
            Self {
                fail_deletes: true,
                ..Self::default()
            }
        }

        /// Number of operations attempted against this layer.
        pub fn calls(&self) -> u64 {
            self.calls.load(Ordering::Relaxed)
        }

        fn check(&self, fails: bool) -> Result<(), CacheError> {
            self.calls.fetch_add(1, Ordering::Relaxed);
            if fails {
                Err(CacheError::Unavailable("connection refused".into()))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl CacheLayer for FailingCache {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
            self.check(self.fail_reads)?;
            Ok(None)
        }

        async fn set(&self, _key: &str, _value: Vec<u8>, _ttl: Duration) -> Result<(), CacheError> {
            self.check(self.fail_writes)
        }

        async fn delete(&self, _key: &str) -> Result<(), CacheError> {
            self.check(self.fail_deletes)
        }

        async fn stats(&self) -> Result<CacheStats, CacheError> {
            self.check(self.fail_reads)?;
            Ok(CacheStats::default())
        }
    }

    /// In-memory store whose collaborator lookup always fails. Every other
    /// operation goes to the wrapped store.
    #[derive(Debug, Clone, Default)]
    pub struct FailingCollaborationLookup {
        inner: Arc<InMemoryCatalogStore>,
        lookups: Arc<AtomicU64>,
    }

    impl FailingCollaborationLookup {
        pub fn new(inner: Arc<InMemoryCatalogStore>) -> Self {
            Self {
                inner,
                lookups: Arc::new(AtomicU64::new(0)),
            }
        }

        /// Number of collaborator lookups attempted.
        pub fn lookups(&self) -> u64 {
            self.lookups.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl CatalogStore for FailingCollaborationLookup {
        async fn album_insert(&self, album: &Album) -> TembangResult<()> {
            self.inner.album_insert(album).await
        }

        async fn album_list(&self) -> TembangResult<Vec<Album>> {
            self.inner.album_list().await
        }

        async fn album_get(&self, id: &AlbumId) -> TembangResult<Option<Album>> {
            self.inner.album_get(id).await
        }

        async fn album_update(&self, id: &AlbumId, input: &AlbumInput) -> TembangResult<bool> {
            self.inner.album_update(id, input).await
        }

        async fn album_delete(&self, id: &AlbumId) -> TembangResult<bool> {
            self.inner.album_delete(id).await
        }

        async fn album_set_cover(&self, id: &AlbumId, cover_url: &str) -> TembangResult<bool> {
            self.inner.album_set_cover(id, cover_url).await
        }

        async fn song_insert(&self, song: &Song) -> TembangResult<()> {
            self.inner.song_insert(song).await
        }

        async fn song_list(&self, query: &SongQuery) -> TembangResult<Vec<SongSummary>> {
            self.inner.song_list(query).await
        }

        async fn song_get(&self, id: &SongId) -> TembangResult<Option<Song>> {
            self.inner.song_get(id).await
        }

        async fn song_update(&self, id: &SongId, input: &SongInput) -> TembangResult<Option<Song>> {
            self.inner.song_update(id, input).await
        }

        async fn song_delete(&self, id: &SongId) -> TembangResult<Option<Song>> {
            self.inner.song_delete(id).await
        }

        async fn songs_by_album(&self, album_id: &AlbumId) -> TembangResult<Vec<SongSummary>> {
            self.inner.songs_by_album(album_id).await
        }

        async fn like_toggle(
            &self,
            album_id: &AlbumId,
            user_id: &UserId,
        ) -> TembangResult<LikeToggleOutcome> {
            self.inner.like_toggle(album_id, user_id).await
        }

        async fn likes_by_album(&self, album_id: &AlbumId) -> TembangResult<Vec<UserId>> {
            self.inner.likes_by_album(album_id).await
        }

        async fn playlist_insert(&self, playlist: &Playlist) -> TembangResult<()> {
            self.inner.playlist_insert(playlist).await
        }

        async fn playlist_get(&self, id: &PlaylistId) -> TembangResult<Option<Playlist>> {
            self.inner.playlist_get(id).await
        }

        async fn playlist_summary(&self, id: &PlaylistId) -> TembangResult<Option<PlaylistSummary>> {
            self.inner.playlist_summary(id).await
        }

        async fn playlists_for_user(&self, user_id: &UserId) -> TembangResult<Vec<PlaylistSummary>> {
            self.inner.playlists_for_user(user_id).await
        }

        async fn playlist_delete(&self, id: &PlaylistId) -> TembangResult<bool> {
            self.inner.playlist_delete(id).await
        }

        async fn playlist_song_insert(
            &self,
            playlist_id: &PlaylistId,
            song_id: &SongId,
        ) -> TembangResult<PlaylistSongId> {
            self.inner.playlist_song_insert(playlist_id, song_id).await
        }

        async fn playlist_songs(&self, playlist_id: &PlaylistId) -> TembangResult<Vec<SongSummary>> {
            self.inner.playlist_songs(playlist_id).await
        }

        async fn playlist_song_delete(
            &self,
            playlist_id: &PlaylistId,
            song_id: &SongId,
        ) -> TembangResult<bool> {
            self.inner.playlist_song_delete(playlist_id, song_id).await
        }

        async fn activity_insert(&self, activity: &Activity) -> TembangResult<()> {
            self.inner.activity_insert(activity).await
        }

        async fn activities(&self, playlist_id: &PlaylistId) -> TembangResult<Vec<ActivityView>> {
            self.inner.activities(playlist_id).await
        }

        async fn collaboration_insert(&self, collaboration: &Collaboration) -> TembangResult<()> {
            self.inner.collaboration_insert(collaboration).await
        }

        async fn collaboration_delete(
            &self,
            playlist_id: &PlaylistId,
            user_id: &UserId,
        ) -> TembangResult<bool> {
            self.inner.collaboration_delete(playlist_id, user_id).await
        }

        async fn collaboration_exists(
            &self,
            _playlist_id: &PlaylistId,
            _user_id: &UserId,
        ) -> TembangResult<bool> {
            self.lookups.fetch_add(1, Ordering::Relaxed);
            Err(StorageError::Unavailable {
                reason: "collaborations replica unreachable".into(),
            }
            .into())
        }

        async fn user_insert(&self, user: &User, password_hash: &str) -> TembangResult<()> {
            self.inner.user_insert(user, password_hash).await
        }

        async fn user_get(&self, id: &UserId) -> TembangResult<Option<User>> {
            self.inner.user_get(id).await
        }

        async fn user_get_by_username(&self, username: &str) -> TembangResult<Option<User>> {
            self.inner.user_get_by_username(username).await
        }

        async fn user_credential(&self, username: &str) -> TembangResult<Option<UserCredential>> {
            self.inner.user_credential(username).await
        }

        async fn refresh_token_insert(&self, token: &str) -> TembangResult<()> {
            self.inner.refresh_token_insert(token).await
        }

        async fn refresh_token_exists(&self, token: &str) -> TembangResult<bool> {
            self.inner.refresh_token_exists(token).await
        }

        async fn refresh_token_delete(&self, token: &str) -> TembangResult<bool> {
            self.inner.refresh_token_delete(token).await
        }

        async fn ping(&self) -> TembangResult<()> {
            self.inner.ping().await
        }
    }
}

// ============================================================================
// HARNESS
// ============================================================================

pub mod harness {
    //! In-memory store plus cache-aside orchestrator.

    use super::*;
    use std::sync::Arc;

    /// Store and cache wired the way the API wires them.
    #[derive(Clone)]
    pub struct CatalogHarness {
        pub store: Arc<InMemoryCatalogStore>,
        pub layer: Arc<dyn CacheLayer>,
        pub cache: Arc<CacheAside>,
    }

    impl Default for CatalogHarness {
        fn default() -> Self {
            Self::new()
        }
    }

    impl CatalogHarness {
        /// Harness backed by a [`MemoryCacheBackend`].
        pub fn new() -> Self {
            Self::with_layer(Arc::new(MemoryCacheBackend::new()))
        }

        /// Harness backed by the given cache layer.
        pub fn with_layer(layer: Arc<dyn CacheLayer>) -> Self {
            let cache = Arc::new(CacheAside::new(Arc::clone(&layer), CacheConfig::default()));
            Self {
                store: Arc::new(InMemoryCatalogStore::new()),
                layer,
                cache,
            }
        }

        /// The store as the trait object the services take.
        pub fn store(&self) -> Arc<dyn CatalogStore> {
            self.store.clone()
        }

        pub async fn seed_album(&self, id: &str, name: &str) -> TembangResult<Album> {
            let album = fixtures::album(id, name, 2008);
            self.store.album_insert(&album).await?;
            Ok(album)
        }

        pub async fn seed_song(
            &self,
            id: &str,
            title: &str,
            performer: &str,
            album_id: Option<&str>,
        ) -> TembangResult<Song> {
            let song = fixtures::song(id, title, performer, album_id);
            self.store.song_insert(&song).await?;
            Ok(song)
        }

        pub async fn seed_user(&self, id: &str, username: &str) -> TembangResult<User> {
            let user = fixtures::user(id, username);
            self.store
                .user_insert(&user, fixtures::UNUSABLE_PASSWORD_HASH)
                .await?;
            Ok(user)
        }

        pub async fn seed_playlist(&self, id: &str, name: &str, owner: &str) -> TembangResult<Playlist> {
            let playlist = fixtures::playlist(id, name, owner);
            self.store.playlist_insert(&playlist).await?;
            Ok(playlist)
        }

        pub async fn seed_collaboration(&self, playlist_id: &str, user_id: &str) -> TembangResult<()> {
            self.store
                .collaboration_insert(&fixtures::collaboration(playlist_id, user_id))
                .await
        }

        /// Two users and a playlist owned by the first: `user-1` owns
        /// `playlist-1`, `user-2` is a stranger until granted access.
        pub async fn seed_playlist_scenario(&self) -> TembangResult<()> {
            self.seed_user("user-1", "owner").await?;
            self.seed_user("user-2", "guest").await?;
            self.seed_playlist("playlist-1", "Road Trip", "user-1").await?;
            Ok(())
        }
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions on the domain error taxonomy.

    use super::*;

    #[track_caller]
    pub fn assert_not_found<T: std::fmt::Debug>(result: &TembangResult<T>) {
        match result {
            Err(e) if e.is_not_found() => {}
            other => panic!("Expected NotFound, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn assert_authorization<T: std::fmt::Debug>(result: &TembangResult<T>) {
        match result {
            Err(e) if e.is_authorization() => {}
            other => panic!("Expected Authorization error, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn assert_invariant<T: std::fmt::Debug>(result: &TembangResult<T>) {
        match result {
            Err(e) if e.is_invariant() => {}
            other => panic!("Expected Invariant error, got: {:?}", other),
        }
    }
}
