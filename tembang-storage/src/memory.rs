//! In-memory catalog store.
//!
//! Backs tests and local development. All tables sit behind a single
//! `RwLock`, so every trait method is atomic with respect to every other,
//! including the like toggle. Foreign keys and unique constraints follow the
//! relational schema in `tembang-api/sql/schema.sql`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use ::async_trait::async_trait;
use tembang_core::{
    Activity, ActivityView, Album, AlbumId, AlbumInput, Collaboration, EntityType, Like, LikeId,
    Playlist, PlaylistId, PlaylistSongId, PlaylistSummary, Song, SongId, SongInput, SongQuery,
    SongSummary, StorageError, TembangResult, User, UserId,
};

use crate::store::{CatalogStore, LikeToggleOutcome, UserCredential};

#[derive(Debug, Clone)]
struct PlaylistSongRow {
    playlist_id: PlaylistId,
    song_id: SongId,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    password_hashes: BTreeMap<UserId, String>,
    refresh_tokens: BTreeSet<String>,
    albums: BTreeMap<AlbumId, Album>,
    songs: BTreeMap<SongId, Song>,
    likes: Vec<Like>,
    playlists: BTreeMap<PlaylistId, Playlist>,
    playlist_songs: Vec<PlaylistSongRow>,
    collaborations: Vec<Collaboration>,
    activities: Vec<Activity>,
}

impl Tables {
    fn require_user(&self, id: &UserId) -> Result<(), StorageError> {
        if self.users.contains_key(id) {
            Ok(())
        } else {
            Err(StorageError::ForeignKey {
                entity_type: EntityType::User,
                reason: format!("user {} does not exist", id),
            })
        }
    }

    fn require_album(&self, id: &AlbumId) -> Result<(), StorageError> {
        if self.albums.contains_key(id) {
            Ok(())
        } else {
            Err(StorageError::ForeignKey {
                entity_type: EntityType::Album,
                reason: format!("album {} does not exist", id),
            })
        }
    }

    fn require_playlist(&self, id: &PlaylistId) -> Result<(), StorageError> {
        if self.playlists.contains_key(id) {
            Ok(())
        } else {
            Err(StorageError::ForeignKey {
                entity_type: EntityType::Playlist,
                reason: format!("playlist {} does not exist", id),
            })
        }
    }

    fn require_song(&self, id: &SongId) -> Result<(), StorageError> {
        if self.songs.contains_key(id) {
            Ok(())
        } else {
            Err(StorageError::ForeignKey {
                entity_type: EntityType::Song,
                reason: format!("song {} does not exist", id),
            })
        }
    }

    fn summarize(&self, playlist: &Playlist) -> Option<PlaylistSummary> {
        self.users.get(&playlist.owner).map(|owner| PlaylistSummary {
            id: playlist.id.clone(),
            name: playlist.name.clone(),
            username: owner.username.clone(),
        })
    }
}

fn duplicate(constraint: &str, reason: String) -> StorageError {
    StorageError::Constraint {
        constraint: constraint.to_string(),
        reason,
    }
}

/// Catalog store held entirely in process memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StorageError> {
        self.tables.read().map_err(|_| StorageError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StorageError> {
        self.tables.write().map_err(|_| StorageError::LockPoisoned)
    }

    /// Number of like rows for the pair. Never more than one.
    pub fn like_rows(&self, album_id: &AlbumId, user_id: &UserId) -> TembangResult<usize> {
        let tables = self.read()?;
        Ok(tables
            .likes
            .iter()
            .filter(|l| &l.album_id == album_id && &l.user_id == user_id)
            .count())
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    // ========================================================================
    // ALBUM OPERATIONS
    // ========================================================================

    async fn album_insert(&self, album: &Album) -> TembangResult<()> {
        let mut tables = self.write()?;
        if tables.albums.contains_key(&album.id) {
            return Err(duplicate("albums_pkey", format!("album {} already exists", album.id)).into());
        }
        tables.albums.insert(album.id.clone(), album.clone());
        Ok(())
    }

    async fn album_list(&self) -> TembangResult<Vec<Album>> {
        Ok(self.read()?.albums.values().cloned().collect())
    }

    async fn album_get(&self, id: &AlbumId) -> TembangResult<Option<Album>> {
        Ok(self.read()?.albums.get(id).cloned())
    }

    async fn album_update(&self, id: &AlbumId, input: &AlbumInput) -> TembangResult<bool> {
        let mut tables = self.write()?;
        match tables.albums.get_mut(id) {
            Some(album) => {
                album.name = input.name.clone();
                album.year = input.year;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn album_delete(&self, id: &AlbumId) -> TembangResult<bool> {
        let mut tables = self.write()?;
        if tables.albums.remove(id).is_none() {
            return Ok(false);
        }
        tables.likes.retain(|l| &l.album_id != id);
        Ok(true)
    }

    async fn album_set_cover(&self, id: &AlbumId, cover_url: &str) -> TembangResult<bool> {
        let mut tables = self.write()?;
        match tables.albums.get_mut(id) {
            Some(album) => {
                album.cover_url = Some(cover_url.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    // ========================================================================
    // SONG OPERATIONS
    // ========================================================================

    async fn song_insert(&self, song: &Song) -> TembangResult<()> {
        let mut tables = self.write()?;
        if tables.songs.contains_key(&song.id) {
            return Err(duplicate("songs_pkey", format!("song {} already exists", song.id)).into());
        }
        tables.songs.insert(song.id.clone(), song.clone());
        Ok(())
    }

    async fn song_list(&self, query: &SongQuery) -> TembangResult<Vec<SongSummary>> {
        Ok(self
            .read()?
            .songs
            .values()
            .filter(|s| query.matches(s))
            .map(Song::summary)
            .collect())
    }

    async fn song_get(&self, id: &SongId) -> TembangResult<Option<Song>> {
        Ok(self.read()?.songs.get(id).cloned())
    }

    async fn song_update(&self, id: &SongId, input: &SongInput) -> TembangResult<Option<Song>> {
        let mut tables = self.write()?;
        let Some(song) = tables.songs.get_mut(id) else {
            return Ok(None);
        };
        let previous = song.clone();
        song.title = input.title.clone();
        song.year = input.year;
        song.performer = input.performer.clone();
        song.genre = input.genre.clone();
        song.duration = input.duration;
        song.album_id = input.album_id.clone();
        Ok(Some(previous))
    }

    async fn song_delete(&self, id: &SongId) -> TembangResult<Option<Song>> {
        let mut tables = self.write()?;
        let removed = tables.songs.remove(id);
        if removed.is_some() {
            tables.playlist_songs.retain(|row| &row.song_id != id);
        }
        Ok(removed)
    }

    async fn songs_by_album(&self, album_id: &AlbumId) -> TembangResult<Vec<SongSummary>> {
        Ok(self
            .read()?
            .songs
            .values()
            .filter(|s| s.album_id.as_ref() == Some(album_id))
            .map(Song::summary)
            .collect())
    }

    // ========================================================================
    // LIKE OPERATIONS
    // ========================================================================

    async fn like_toggle(
        &self,
        album_id: &AlbumId,
        user_id: &UserId,
    ) -> TembangResult<LikeToggleOutcome> {
        let mut tables = self.write()?;
        tables.require_album(album_id)?;
        tables.require_user(user_id)?;

        let before = tables.likes.len();
        tables
            .likes
            .retain(|l| !(&l.album_id == album_id && &l.user_id == user_id));
        let removed = (before - tables.likes.len()) as u64;
        if removed > 0 {
            return Ok(LikeToggleOutcome {
                removed,
                inserted: 0,
            });
        }

        tables.likes.push(Like {
            id: LikeId::new(),
            album_id: album_id.clone(),
            user_id: user_id.clone(),
        });
        Ok(LikeToggleOutcome::inserted())
    }

    async fn likes_by_album(&self, album_id: &AlbumId) -> TembangResult<Vec<UserId>> {
        Ok(self
            .read()?
            .likes
            .iter()
            .filter(|l| &l.album_id == album_id)
            .map(|l| l.user_id.clone())
            .collect())
    }

    // ========================================================================
    // PLAYLIST OPERATIONS
    // ========================================================================

    async fn playlist_insert(&self, playlist: &Playlist) -> TembangResult<()> {
        let mut tables = self.write()?;
        tables.require_user(&playlist.owner)?;
        if tables.playlists.contains_key(&playlist.id) {
            return Err(duplicate(
                "playlists_pkey",
                format!("playlist {} already exists", playlist.id),
            )
            .into());
        }
        tables.playlists.insert(playlist.id.clone(), playlist.clone());
        Ok(())
    }

    async fn playlist_get(&self, id: &PlaylistId) -> TembangResult<Option<Playlist>> {
        Ok(self.read()?.playlists.get(id).cloned())
    }

    async fn playlist_summary(&self, id: &PlaylistId) -> TembangResult<Option<PlaylistSummary>> {
        let tables = self.read()?;
        Ok(tables.playlists.get(id).and_then(|p| tables.summarize(p)))
    }

    async fn playlists_for_user(&self, user_id: &UserId) -> TembangResult<Vec<PlaylistSummary>> {
        let tables = self.read()?;
        Ok(tables
            .playlists
            .values()
            .filter(|p| {
                &p.owner == user_id
                    || tables
                        .collaborations
                        .iter()
                        .any(|c| c.playlist_id == p.id && &c.user_id == user_id)
            })
            .filter_map(|p| tables.summarize(p))
            .collect())
    }

    async fn playlist_delete(&self, id: &PlaylistId) -> TembangResult<bool> {
        let mut tables = self.write()?;
        if tables.playlists.remove(id).is_none() {
            return Ok(false);
        }
        tables.playlist_songs.retain(|row| &row.playlist_id != id);
        tables.collaborations.retain(|c| &c.playlist_id != id);
        tables.activities.retain(|a| &a.playlist_id != id);
        Ok(true)
    }

    async fn playlist_song_insert(
        &self,
        playlist_id: &PlaylistId,
        song_id: &SongId,
    ) -> TembangResult<PlaylistSongId> {
        let mut tables = self.write()?;
        tables.require_playlist(playlist_id)?;
        tables.require_song(song_id)?;
        if tables
            .playlist_songs
            .iter()
            .any(|row| &row.playlist_id == playlist_id && &row.song_id == song_id)
        {
            return Err(duplicate(
                "playlist_songs_playlist_id_song_id_key",
                format!("song {} is already in playlist {}", song_id, playlist_id),
            )
            .into());
        }
        let id = PlaylistSongId::new();
        tables.playlist_songs.push(PlaylistSongRow {
            playlist_id: playlist_id.clone(),
            song_id: song_id.clone(),
        });
        Ok(id)
    }

    async fn playlist_songs(&self, playlist_id: &PlaylistId) -> TembangResult<Vec<SongSummary>> {
        let tables = self.read()?;
        Ok(tables
            .playlist_songs
            .iter()
            .filter(|row| &row.playlist_id == playlist_id)
            .filter_map(|row| tables.songs.get(&row.song_id).map(Song::summary))
            .collect())
    }

    async fn playlist_song_delete(
        &self,
        playlist_id: &PlaylistId,
        song_id: &SongId,
    ) -> TembangResult<bool> {
        let mut tables = self.write()?;
        let before = tables.playlist_songs.len();
        tables
            .playlist_songs
            .retain(|row| !(&row.playlist_id == playlist_id && &row.song_id == song_id));
        Ok(tables.playlist_songs.len() < before)
    }

    async fn activity_insert(&self, activity: &Activity) -> TembangResult<()> {
        let mut tables = self.write()?;
        tables.require_playlist(&activity.playlist_id)?;
        tables.activities.push(activity.clone());
        Ok(())
    }

    async fn activities(&self, playlist_id: &PlaylistId) -> TembangResult<Vec<ActivityView>> {
        let tables = self.read()?;
        let mut views: Vec<ActivityView> = tables
            .activities
            .iter()
            .filter(|a| &a.playlist_id == playlist_id)
            .filter_map(|a| {
                let user = tables.users.get(&a.user_id)?;
                let song = tables.songs.get(&a.song_id)?;
                Some(ActivityView {
                    username: user.username.clone(),
                    title: song.title.clone(),
                    action: a.action,
                    time: a.time,
                })
            })
            .collect();
        views.sort_by_key(|v| v.time);
        Ok(views)
    }

    // ========================================================================
    // COLLABORATION OPERATIONS
    // ========================================================================

    async fn collaboration_insert(&self, collaboration: &Collaboration) -> TembangResult<()> {
        let mut tables = self.write()?;
        tables.require_playlist(&collaboration.playlist_id)?;
        tables.require_user(&collaboration.user_id)?;
        if tables.collaborations.iter().any(|c| {
            c.playlist_id == collaboration.playlist_id && c.user_id == collaboration.user_id
        }) {
            return Err(duplicate(
                "collaborations_playlist_id_user_id_key",
                format!(
                    "user {} already collaborates on playlist {}",
                    collaboration.user_id, collaboration.playlist_id
                ),
            )
            .into());
        }
        tables.collaborations.push(collaboration.clone());
        Ok(())
    }

    async fn collaboration_delete(
        &self,
        playlist_id: &PlaylistId,
        user_id: &UserId,
    ) -> TembangResult<bool> {
        let mut tables = self.write()?;
        let before = tables.collaborations.len();
        tables
            .collaborations
            .retain(|c| !(&c.playlist_id == playlist_id && &c.user_id == user_id));
        Ok(tables.collaborations.len() < before)
    }

    async fn collaboration_exists(
        &self,
        playlist_id: &PlaylistId,
        user_id: &UserId,
    ) -> TembangResult<bool> {
        Ok(self
            .read()?
            .collaborations
            .iter()
            .any(|c| &c.playlist_id == playlist_id && &c.user_id == user_id))
    }

    // ========================================================================
    // USER OPERATIONS
    // ========================================================================

    async fn user_insert(&self, user: &User, password_hash: &str) -> TembangResult<()> {
        let mut tables = self.write()?;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(duplicate(
                "users_username_key",
                format!("username {} is taken", user.username),
            )
            .into());
        }
        if tables.users.contains_key(&user.id) {
            return Err(duplicate("users_pkey", format!("user {} already exists", user.id)).into());
        }
        tables.users.insert(user.id.clone(), user.clone());
        tables
            .password_hashes
            .insert(user.id.clone(), password_hash.to_string());
        Ok(())
    }

    async fn user_get(&self, id: &UserId) -> TembangResult<Option<User>> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn user_get_by_username(&self, username: &str) -> TembangResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn user_credential(&self, username: &str) -> TembangResult<Option<UserCredential>> {
        let tables = self.read()?;
        let Some(user) = tables.users.values().find(|u| u.username == username) else {
            return Ok(None);
        };
        Ok(tables
            .password_hashes
            .get(&user.id)
            .map(|hash| UserCredential {
                user_id: user.id.clone(),
                password_hash: hash.clone(),
            }))
    }

    // ========================================================================
    // REFRESH TOKENS
    // ========================================================================

    async fn refresh_token_insert(&self, token: &str) -> TembangResult<()> {
        if !self.write()?.refresh_tokens.insert(token.to_string()) {
            return Err(duplicate("authentications_pkey", "refresh token already stored".into()).into());
        }
        Ok(())
    }

    async fn refresh_token_exists(&self, token: &str) -> TembangResult<bool> {
        Ok(self.read()?.refresh_tokens.contains(token))
    }

    async fn refresh_token_delete(&self, token: &str) -> TembangResult<bool> {
        Ok(self.write()?.refresh_tokens.remove(token))
    }

    async fn ping(&self) -> TembangResult<()> {
        self.read().map(|_| ())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tembang_core::{ActivityAction, ActivityId, CollaborationId};

    fn user(id: &str, username: &str) -> User {
        User {
            id: UserId::from(id),
            username: username.to_string(),
            fullname: username.to_uppercase(),
        }
    }

    fn album(id: &str) -> Album {
        Album {
            id: AlbumId::from(id),
            name: format!("Album {}", id),
            year: 2001,
            cover_url: None,
        }
    }

    fn song(id: &str, title: &str, album_id: Option<&str>) -> Song {
        Song {
            id: SongId::from(id),
            title: title.to_string(),
            year: 2001,
            performer: "Performer".to_string(),
            genre: Some("Pop".to_string()),
            duration: Some(200),
            album_id: album_id.map(AlbumId::from),
        }
    }

    async fn seeded() -> InMemoryCatalogStore {
        let store = InMemoryCatalogStore::new();
        store.user_insert(&user("user-1", "alice"), "hash-1").await.unwrap();
        store.user_insert(&user("user-2", "bob"), "hash-2").await.unwrap();
        store.album_insert(&album("album-1")).await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_like_toggle_alternates() {
        let store = seeded().await;
        let a = AlbumId::from("album-1");
        let u = UserId::from("user-1");

        assert_eq!(store.like_toggle(&a, &u).await.unwrap(), LikeToggleOutcome::inserted());
        assert_eq!(store.like_rows(&a, &u).unwrap(), 1);
        assert_eq!(store.like_toggle(&a, &u).await.unwrap(), LikeToggleOutcome::removed());
        assert_eq!(store.like_rows(&a, &u).unwrap(), 0);
    }

    #[tokio::test]
    async fn test_like_toggle_requires_existing_album() {
        let store = seeded().await;
        let err = store
            .like_toggle(&AlbumId::from("album-404"), &UserId::from("user-1"))
            .await
            .unwrap_err();
        assert!(err.is_invariant());
    }

    #[tokio::test]
    async fn test_album_delete_cascades_likes() {
        let store = seeded().await;
        let a = AlbumId::from("album-1");
        store.like_toggle(&a, &UserId::from("user-1")).await.unwrap();

        assert!(store.album_delete(&a).await.unwrap());
        assert!(store.likes_by_album(&a).await.unwrap().is_empty());
        assert!(!store.album_delete(&a).await.unwrap());
    }

    #[tokio::test]
    async fn test_song_update_returns_previous_row() {
        let store = seeded().await;
        store.song_insert(&song("song-1", "Old", Some("album-1"))).await.unwrap();

        let input = SongInput {
            title: "New".into(),
            year: 2002,
            performer: "Someone".into(),
            genre: None,
            duration: None,
            album_id: None,
        };
        let previous = store
            .song_update(&SongId::from("song-1"), &input)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(previous.title, "Old");
        assert_eq!(previous.album_id, Some(AlbumId::from("album-1")));
        assert!(store
            .songs_by_album(&AlbumId::from("album-1"))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_playlists_for_user_lists_each_once() {
        let store = seeded().await;
        let p = Playlist {
            id: PlaylistId::from("playlist-1"),
            name: "Road trip".into(),
            owner: UserId::from("user-1"),
        };
        store.playlist_insert(&p).await.unwrap();
        store
            .collaboration_insert(&Collaboration {
                id: CollaborationId::new(),
                playlist_id: p.id.clone(),
                user_id: UserId::from("user-2"),
            })
            .await
            .unwrap();

        let owned = store.playlists_for_user(&UserId::from("user-1")).await.unwrap();
        let shared = store.playlists_for_user(&UserId::from("user-2")).await.unwrap();
        assert_eq!(owned.len(), 1);
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].username, "alice");
    }

    #[tokio::test]
    async fn test_duplicate_collaboration_rejected() {
        let store = seeded().await;
        let p = Playlist {
            id: PlaylistId::from("playlist-1"),
            name: "Mix".into(),
            owner: UserId::from("user-1"),
        };
        store.playlist_insert(&p).await.unwrap();
        let grant = Collaboration {
            id: CollaborationId::new(),
            playlist_id: p.id.clone(),
            user_id: UserId::from("user-2"),
        };
        store.collaboration_insert(&grant).await.unwrap();
        let err = store
            .collaboration_insert(&Collaboration {
                id: CollaborationId::new(),
                ..grant
            })
            .await
            .unwrap_err();
        assert!(err.is_invariant());
    }

    #[tokio::test]
    async fn test_playlist_delete_cascades() {
        let store = seeded().await;
        let p = Playlist {
            id: PlaylistId::from("playlist-1"),
            name: "Mix".into(),
            owner: UserId::from("user-1"),
        };
        store.playlist_insert(&p).await.unwrap();
        store.song_insert(&song("song-1", "One", None)).await.unwrap();
        store
            .playlist_song_insert(&p.id, &SongId::from("song-1"))
            .await
            .unwrap();
        store
            .activity_insert(&Activity {
                id: ActivityId::new(),
                playlist_id: p.id.clone(),
                song_id: SongId::from("song-1"),
                user_id: UserId::from("user-1"),
                action: ActivityAction::Add,
                time: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            })
            .await
            .unwrap();

        assert!(store.playlist_delete(&p.id).await.unwrap());
        assert!(store.playlist_songs(&p.id).await.unwrap().is_empty());
        assert!(store.activities(&p.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_activities_sorted_by_time() {
        let store = seeded().await;
        let p = Playlist {
            id: PlaylistId::from("playlist-1"),
            name: "Mix".into(),
            owner: UserId::from("user-1"),
        };
        store.playlist_insert(&p).await.unwrap();
        store.song_insert(&song("song-1", "One", None)).await.unwrap();

        for (hour, action) in [(5, ActivityAction::Delete), (1, ActivityAction::Add)] {
            store
                .activity_insert(&Activity {
                    id: ActivityId::new(),
                    playlist_id: p.id.clone(),
                    song_id: SongId::from("song-1"),
                    user_id: UserId::from("user-1"),
                    action,
                    time: Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap(),
                })
                .await
                .unwrap();
        }

        let log = store.activities(&p.id).await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].action, ActivityAction::Add);
        assert_eq!(log[1].action, ActivityAction::Delete);
        assert_eq!(log[0].username, "alice");
        assert_eq!(log[0].title, "One");
    }

    #[tokio::test]
    async fn test_username_unique() {
        let store = seeded().await;
        let err = store.user_insert(&user("user-3", "alice"), "hash-3").await.unwrap_err();
        assert!(err.is_invariant());
        assert!(store.user_get_by_username("alice").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_user_credential_by_username() {
        let store = seeded().await;
        let credential = store.user_credential("bob").await.unwrap().unwrap();
        assert_eq!(credential.user_id, UserId::from("user-2"));
        assert_eq!(credential.password_hash, "hash-2");
        assert!(store.user_credential("carol").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refresh_token_lifecycle() {
        let store = InMemoryCatalogStore::new();
        assert!(!store.refresh_token_exists("rt-1").await.unwrap());

        store.refresh_token_insert("rt-1").await.unwrap();
        assert!(store.refresh_token_exists("rt-1").await.unwrap());
        assert!(store.refresh_token_insert("rt-1").await.unwrap_err().is_invariant());

        assert!(store.refresh_token_delete("rt-1").await.unwrap());
        assert!(!store.refresh_token_delete("rt-1").await.unwrap());
        assert!(!store.refresh_token_exists("rt-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_ping_releases_the_lock() {
        let store = seeded().await;
        store.ping().await.unwrap();
        store.ping().await.unwrap();
        assert!(store.user_credential("alice").await.unwrap().is_some());
    }
}
