//! Durable store trait.
//!
//! The relational source of truth for every catalog entity. All writes land
//! here before any cache key is invalidated. Implementations must be safe to
//! share across concurrent requests; they provide no cross-request locking
//! beyond what a single method call does atomically.

use ::async_trait::async_trait;
use tembang_core::{
    Activity, ActivityView, Album, AlbumId, AlbumInput, Collaboration, Playlist, PlaylistId,
    PlaylistSongId, PlaylistSummary, Song, SongId, SongInput, SongQuery, SongSummary,
    TembangResult, User, UserId,
};

/// Row counts reported by an atomic like toggle.
///
/// A well-formed toggle removes exactly one row or inserts exactly one row.
/// Anything else means the toggle lost a race or hit a constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LikeToggleOutcome {
    pub removed: u64,
    pub inserted: u64,
}

impl LikeToggleOutcome {
    pub fn removed() -> Self {
        Self {
            removed: 1,
            inserted: 0,
        }
    }

    pub fn inserted() -> Self {
        Self {
            removed: 0,
            inserted: 1,
        }
    }
}

/// Stored login credential of a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredential {
    pub user_id: UserId,
    /// PHC-format password hash.
    pub password_hash: String,
}

/// Async catalog store.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    // ========================================================================
    // ALBUM OPERATIONS
    // ========================================================================

    /// Insert a new album.
    async fn album_insert(&self, album: &Album) -> TembangResult<()>;

    /// List every album.
    async fn album_list(&self) -> TembangResult<Vec<Album>>;

    /// Get an album by ID.
    async fn album_get(&self, id: &AlbumId) -> TembangResult<Option<Album>>;

    /// Update name and year. Returns `false` when the album does not exist.
    async fn album_update(&self, id: &AlbumId, input: &AlbumInput) -> TembangResult<bool>;

    /// Delete an album and its likes. Returns `false` when it did not exist.
    async fn album_delete(&self, id: &AlbumId) -> TembangResult<bool>;

    /// Set the cover URL. Returns `false` when the album does not exist.
    async fn album_set_cover(&self, id: &AlbumId, cover_url: &str) -> TembangResult<bool>;

    // ========================================================================
    // SONG OPERATIONS
    // ========================================================================

    /// Insert a new song.
    async fn song_insert(&self, song: &Song) -> TembangResult<()>;

    /// List songs matching a title/performer filter.
    async fn song_list(&self, query: &SongQuery) -> TembangResult<Vec<SongSummary>>;

    /// Get a song by ID.
    async fn song_get(&self, id: &SongId) -> TembangResult<Option<Song>>;

    /// Replace a song's fields, returning the row as it was before the
    /// update, or `None` when the song does not exist.
    async fn song_update(&self, id: &SongId, input: &SongInput) -> TembangResult<Option<Song>>;

    /// Delete a song, returning the deleted row.
    async fn song_delete(&self, id: &SongId) -> TembangResult<Option<Song>>;

    /// Songs whose album reference is `album_id`.
    async fn songs_by_album(&self, album_id: &AlbumId) -> TembangResult<Vec<SongSummary>>;

    // ========================================================================
    // LIKE OPERATIONS
    // ========================================================================

    /// Atomically flip the like for (album, user): delete the row if it
    /// exists, insert it otherwise.
    async fn like_toggle(
        &self,
        album_id: &AlbumId,
        user_id: &UserId,
    ) -> TembangResult<LikeToggleOutcome>;

    /// Users who like the album.
    async fn likes_by_album(&self, album_id: &AlbumId) -> TembangResult<Vec<UserId>>;

    // ========================================================================
    // PLAYLIST OPERATIONS
    // ========================================================================

    /// Insert a new playlist.
    async fn playlist_insert(&self, playlist: &Playlist) -> TembangResult<()>;

    /// Get a playlist by ID.
    async fn playlist_get(&self, id: &PlaylistId) -> TembangResult<Option<Playlist>>;

    /// Playlist with its owner's username.
    async fn playlist_summary(&self, id: &PlaylistId) -> TembangResult<Option<PlaylistSummary>>;

    /// Playlists the user owns or collaborates on, each listed once.
    async fn playlists_for_user(&self, user_id: &UserId) -> TembangResult<Vec<PlaylistSummary>>;

    /// Delete a playlist with its songs, collaborations and activities.
    async fn playlist_delete(&self, id: &PlaylistId) -> TembangResult<bool>;

    /// Add a song to a playlist.
    async fn playlist_song_insert(
        &self,
        playlist_id: &PlaylistId,
        song_id: &SongId,
    ) -> TembangResult<PlaylistSongId>;

    /// Songs in a playlist.
    async fn playlist_songs(&self, playlist_id: &PlaylistId) -> TembangResult<Vec<SongSummary>>;

    /// Remove a song from a playlist. Returns `false` when it was not there.
    async fn playlist_song_delete(
        &self,
        playlist_id: &PlaylistId,
        song_id: &SongId,
    ) -> TembangResult<bool>;

    /// Append an activity record.
    async fn activity_insert(&self, activity: &Activity) -> TembangResult<()>;

    /// Activity log of a playlist, oldest first.
    async fn activities(&self, playlist_id: &PlaylistId) -> TembangResult<Vec<ActivityView>>;

    // ========================================================================
    // COLLABORATION OPERATIONS
    // ========================================================================

    /// Grant a user access to a playlist. Duplicate pairs are rejected.
    async fn collaboration_insert(&self, collaboration: &Collaboration) -> TembangResult<()>;

    /// Revoke a grant. Returns `false` when no grant existed.
    async fn collaboration_delete(
        &self,
        playlist_id: &PlaylistId,
        user_id: &UserId,
    ) -> TembangResult<bool>;

    /// Whether the user collaborates on the playlist.
    async fn collaboration_exists(
        &self,
        playlist_id: &PlaylistId,
        user_id: &UserId,
    ) -> TembangResult<bool>;

    // ========================================================================
    // USER OPERATIONS
    // ========================================================================

    /// Insert a new user with its password hash. Duplicate usernames are
    /// rejected.
    async fn user_insert(&self, user: &User, password_hash: &str) -> TembangResult<()>;

    /// Get a user by ID.
    async fn user_get(&self, id: &UserId) -> TembangResult<Option<User>>;

    /// Get a user by username.
    async fn user_get_by_username(&self, username: &str) -> TembangResult<Option<User>>;

    /// Login credential for a username.
    async fn user_credential(&self, username: &str) -> TembangResult<Option<UserCredential>>;

    // ========================================================================
    // REFRESH TOKENS
    // ========================================================================

    async fn refresh_token_insert(&self, token: &str) -> TembangResult<()>;

    async fn refresh_token_exists(&self, token: &str) -> TembangResult<bool>;

    /// Returns `false` when the token was not stored.
    async fn refresh_token_delete(&self, token: &str) -> TembangResult<bool>;

    // ========================================================================
    // HEALTH
    // ========================================================================

    /// Round-trip to the store.
    async fn ping(&self) -> TembangResult<()>;
}
