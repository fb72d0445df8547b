//! Song-related API types

use serde::{Deserialize, Serialize};
use tembang_core::{AlbumId, SongId, SongInput, SongQuery, SongSummary};

use super::{required, required_text};
use crate::error::ApiResult;

/// Title given to songs created without one.
pub const DEFAULT_SONG_TITLE: &str = "untitled";

/// Request to create or replace a song.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SongRequest {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub performer: Option<String>,
    pub genre: Option<String>,
    /// Duration in seconds
    pub duration: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub album_id: Option<AlbumId>,
}

impl SongRequest {
    /// Input for a new song. A missing title falls back to
    /// [`DEFAULT_SONG_TITLE`].
    pub fn into_new_input(mut self) -> ApiResult<SongInput> {
        if self.title.is_none() {
            self.title = Some(DEFAULT_SONG_TITLE.to_string());
        }
        self.into_input()
    }

    /// Input for a full replacement. Every required field must be present.
    pub fn into_input(self) -> ApiResult<SongInput> {
        Ok(SongInput {
            title: required_text(self.title, "title")?,
            year: required(self.year, "year")?,
            performer: required_text(self.performer, "performer")?,
            genre: self.genre,
            duration: self.duration,
            album_id: self.album_id,
        })
    }
}

/// Response to a successful song creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SongCreatedResponse {
    #[schema(value_type = String)]
    pub song_id: SongId,
}

/// Query string of `GET /songs`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SongListParams {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Case-insensitive substring of the performer
    pub performer: Option<String>,
}

impl From<SongListParams> for SongQuery {
    fn from(params: SongListParams) -> Self {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        SongQuery {
            title: non_blank(params.title),
            performer: non_blank(params.performer),
        }
    }
}

/// Songs matching a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SongListResponse {
    pub songs: Vec<SongSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_song_defaults_title() {
        let req = SongRequest {
            year: Some(2005),
            performer: Some("Coldplay".into()),
            ..Default::default()
        };
        assert_eq!(req.into_new_input().unwrap().title, DEFAULT_SONG_TITLE);
    }

    #[test]
    fn test_replacement_requires_title() {
        let req = SongRequest {
            year: Some(2005),
            performer: Some("Coldplay".into()),
            ..Default::default()
        };
        assert!(req.into_input().is_err());
    }

    #[test]
    fn test_blank_filters_are_dropped() {
        let query: SongQuery = SongListParams {
            title: Some(" ".into()),
            performer: Some("cold".into()),
        }
        .into();
        assert_eq!(query.title, None);
        assert_eq!(query.performer.as_deref(), Some("cold"));
    }
}
