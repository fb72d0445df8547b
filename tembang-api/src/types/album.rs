//! Album-related API types

use serde::{Deserialize, Serialize};
use tembang_core::{Album, AlbumId, AlbumInput, LikeState, SongSummary};

use super::{required, required_text};
use crate::error::ApiResult;

/// Request to create or replace an album.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlbumRequest {
    /// Album name
    pub name: Option<String>,
    /// Release year
    pub year: Option<i32>,
}

impl AlbumRequest {
    pub fn into_input(self) -> ApiResult<AlbumInput> {
        Ok(AlbumInput {
            name: required_text(self.name, "name")?,
            year: required(self.year, "year")?,
        })
    }
}

/// Response to a successful album creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlbumCreatedResponse {
    #[schema(value_type = String)]
    pub album_id: AlbumId,
}

/// Every album.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct AlbumListResponse {
    pub albums: Vec<Album>,
}

/// An album together with the songs that reference it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDetail {
    #[serde(flatten)]
    pub album: Album,
    pub songs: Vec<SongSummary>,
}

/// Request to record an album cover location.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CoverRequest {
    /// Public URL of the uploaded cover image
    pub cover_url: Option<String>,
}

/// Result of a like toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggleResponse {
    #[schema(value_type = String)]
    pub album_id: AlbumId,
    pub state: LikeState,
}

/// Number of users who like an album.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LikeCountResponse {
    pub likes: u64,
}
