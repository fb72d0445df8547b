//! Playlist and collaboration API types

use serde::{Deserialize, Serialize};
use tembang_core::{
    ActivityView, CollaborationId, PlaylistId, PlaylistSummary, SongId, SongSummary, UserId,
};

/// Request to create a playlist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlaylistRequest {
    pub name: Option<String>,
}

/// Response to a successful playlist creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistCreatedResponse {
    #[schema(value_type = String)]
    pub playlist_id: PlaylistId,
}

/// Playlists visible to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PlaylistListResponse {
    pub playlists: Vec<PlaylistSummary>,
}

/// Body naming a song, for adding to or removing from a playlist.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSongRequest {
    #[schema(value_type = Option<String>)]
    pub song_id: Option<SongId>,
}

/// A playlist with its songs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PlaylistDetail {
    #[serde(flatten)]
    pub playlist: PlaylistSummary,
    pub songs: Vec<SongSummary>,
}

/// Activity log of a playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActivitiesResponse {
    #[schema(value_type = String)]
    pub playlist_id: PlaylistId,
    pub activities: Vec<ActivityView>,
}

/// Body naming a (playlist, user) collaboration pair.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationRequest {
    #[schema(value_type = Option<String>)]
    pub playlist_id: Option<PlaylistId>,
    #[schema(value_type = Option<String>)]
    pub user_id: Option<UserId>,
}

/// Response to a successful collaboration grant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollaborationCreatedResponse {
    #[schema(value_type = String)]
    pub collaboration_id: CollaborationId,
}
