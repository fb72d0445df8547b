//! Playlist Service
//!
//! Playlist lifecycle, playlist songs and the activity log. Every operation
//! on an existing playlist goes through [`PlaylistAccessResolver`] first.

use chrono::Utc;
use tembang_core::{
    Activity, ActivityAction, ActivityId, ActivityView, EntityType, Playlist, PlaylistId,
    PlaylistSummary, SongId, TembangError, TembangResult, UserId,
};
use tembang_storage::CatalogStore;

use super::PlaylistAccessResolver;
use crate::types::PlaylistDetail;

/// Create a playlist owned by `owner`.
pub async fn create_playlist(
    store: &dyn CatalogStore,
    name: String,
    owner: &UserId,
) -> TembangResult<PlaylistId> {
    let playlist = Playlist {
        id: PlaylistId::new(),
        name,
        owner: owner.clone(),
    };
    store.playlist_insert(&playlist).await?;
    tracing::info!(playlist_id = %playlist.id, owner = %owner, "Playlist created");
    Ok(playlist.id)
}

/// Playlists the user owns or collaborates on.
pub async fn list_playlists(
    store: &dyn CatalogStore,
    user_id: &UserId,
) -> TembangResult<Vec<PlaylistSummary>> {
    store.playlists_for_user(user_id).await
}

/// Delete a playlist. Owner only.
pub async fn delete_playlist(
    store: &dyn CatalogStore,
    access: &PlaylistAccessResolver,
    playlist_id: &PlaylistId,
    user_id: &UserId,
) -> TembangResult<()> {
    access.verify_playlist_owner(playlist_id, user_id).await?;
    if !store.playlist_delete(playlist_id).await? {
        return Err(TembangError::not_found(EntityType::Playlist, "Playlist not found"));
    }
    tracing::info!(playlist_id = %playlist_id, "Playlist deleted");
    Ok(())
}

async fn record_activity(
    store: &dyn CatalogStore,
    playlist_id: &PlaylistId,
    song_id: &SongId,
    user_id: &UserId,
    action: ActivityAction,
) -> TembangResult<()> {
    store
        .activity_insert(&Activity {
            id: ActivityId::new(),
            playlist_id: playlist_id.clone(),
            song_id: song_id.clone(),
            user_id: user_id.clone(),
            action,
            time: Utc::now(),
        })
        .await
}

/// Add a song to a playlist and log an `add` activity.
pub async fn add_song(
    store: &dyn CatalogStore,
    access: &PlaylistAccessResolver,
    playlist_id: &PlaylistId,
    song_id: &SongId,
    user_id: &UserId,
) -> TembangResult<()> {
    access.verify_playlist_access(playlist_id, user_id).await?;
    if store.song_get(song_id).await?.is_none() {
        return Err(TembangError::not_found(EntityType::Song, "Song not found"));
    }
    store.playlist_song_insert(playlist_id, song_id).await?;
    record_activity(store, playlist_id, song_id, user_id, ActivityAction::Add).await
}

/// A playlist with its songs.
pub async fn playlist_with_songs(
    store: &dyn CatalogStore,
    access: &PlaylistAccessResolver,
    playlist_id: &PlaylistId,
    user_id: &UserId,
) -> TembangResult<PlaylistDetail> {
    access.verify_playlist_access(playlist_id, user_id).await?;
    let playlist = store
        .playlist_summary(playlist_id)
        .await?
        .ok_or_else(|| TembangError::not_found(EntityType::Playlist, "Playlist not found"))?;
    let songs = store.playlist_songs(playlist_id).await?;
    Ok(PlaylistDetail { playlist, songs })
}

/// Remove a song from a playlist and log a `delete` activity.
pub async fn remove_song(
    store: &dyn CatalogStore,
    access: &PlaylistAccessResolver,
    playlist_id: &PlaylistId,
    song_id: &SongId,
    user_id: &UserId,
) -> TembangResult<()> {
    access.verify_playlist_access(playlist_id, user_id).await?;
    if !store.playlist_song_delete(playlist_id, song_id).await? {
        return Err(TembangError::invariant(
            "Failed to remove song from playlist: song is not in the playlist",
        ));
    }
    record_activity(store, playlist_id, song_id, user_id, ActivityAction::Delete).await
}

/// Activity log of a playlist, oldest first.
pub async fn activities(
    store: &dyn CatalogStore,
    access: &PlaylistAccessResolver,
    playlist_id: &PlaylistId,
    user_id: &UserId,
) -> TembangResult<Vec<ActivityView>> {
    access.verify_playlist_access(playlist_id, user_id).await?;
    store.activities(playlist_id).await
}
