//! Enum types shared across the catalog

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of entity, used in error reporting and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Album,
    Song,
    Playlist,
    PlaylistSong,
    Collaboration,
    Like,
    Activity,
    User,
}

impl EntityType {
    /// Human-readable name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Album => "album",
            EntityType::Song => "song",
            EntityType::Playlist => "playlist",
            EntityType::PlaylistSong => "playlist song",
            EntityType::Collaboration => "collaboration",
            EntityType::Like => "like",
            EntityType::Activity => "activity",
            EntityType::User => "user",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened to a song in a playlist's activity log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum ActivityAction {
    Add,
    Delete,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Add => "add",
            ActivityAction::Delete => "delete",
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" => Ok(ActivityAction::Add),
            "delete" => Ok(ActivityAction::Delete),
            _ => Err(format!("Invalid ActivityAction: {}", s)),
        }
    }
}

/// Like state of one (album, user) pair.
///
/// Every toggle is an edge between the two states; nothing else moves a
/// pair between them short of deleting the album or the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum LikeState {
    Liked,
    NotLiked,
}

impl LikeState {
    /// The state a single toggle moves to.
    pub fn toggled(self) -> Self {
        match self {
            LikeState::Liked => LikeState::NotLiked,
            LikeState::NotLiked => LikeState::Liked,
        }
    }

    pub fn is_liked(self) -> bool {
        matches!(self, LikeState::Liked)
    }
}

impl From<bool> for LikeState {
    fn from(liked: bool) -> Self {
        if liked {
            LikeState::Liked
        } else {
            LikeState::NotLiked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_action_roundtrip() {
        for action in [ActivityAction::Add, ActivityAction::Delete] {
            assert_eq!(action.to_string().parse::<ActivityAction>(), Ok(action));
        }
        assert!("move".parse::<ActivityAction>().is_err());
    }

    #[test]
    fn test_like_state_toggle_is_involution() {
        for state in [LikeState::Liked, LikeState::NotLiked] {
            assert_ne!(state.toggled(), state);
            assert_eq!(state.toggled().toggled(), state);
        }
    }

    #[test]
    fn test_activity_action_serializes_lowercase() {
        let json = serde_json::to_string(&ActivityAction::Delete).expect("serialize");
        assert_eq!(json, "\"delete\"");
    }
}
