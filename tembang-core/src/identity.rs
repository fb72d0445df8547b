//! Identity types for Tembang entities
//!
//! Every entity id is a prefixed string (`album-…`, `song-…`) whose suffix is
//! a UUIDv7 in simple form, so ids of one kind sort by creation time.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Common behaviour shared by all typed entity ids.
pub trait EntityIdType:
    Clone + Eq + std::hash::Hash + std::fmt::Display + AsRef<str> + Send + Sync + 'static
{
    /// Prefix placed before the generated suffix.
    const PREFIX: &'static str;

    /// Generate a fresh, timestamp-sortable id.
    fn generate() -> Self;

    /// Wrap an existing id string without validation.
    fn from_string(value: impl Into<String>) -> Self;

    /// Borrow the raw id string.
    fn as_str(&self) -> &str;

    /// Whether the raw value carries this id type's prefix.
    fn has_expected_prefix(&self) -> bool {
        self.as_str()
            .strip_prefix(Self::PREFIX)
            .is_some_and(|rest| rest.starts_with('-'))
    }
}

/// Build a prefixed id string from a fresh UUIDv7.
pub fn new_prefixed_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::now_v7().simple())
}

macro_rules! define_entity_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
        #[serde(transparent)]
        pub struct $name(String);

        impl EntityIdType for $name {
            const PREFIX: &'static str = $prefix;

            fn generate() -> Self {
                Self(new_prefixed_id(Self::PREFIX))
            }

            fn from_string(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl $name {
            /// Generate a fresh id.
            pub fn new() -> Self {
                <Self as EntityIdType>::generate()
            }

            /// Consume the id and return the raw string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

define_entity_id!(
    /// Identifier of an album.
    AlbumId,
    "album"
);
define_entity_id!(
    /// Identifier of a song.
    SongId,
    "song"
);
define_entity_id!(
    /// Identifier of a playlist.
    PlaylistId,
    "playlist"
);
define_entity_id!(
    /// Identifier of a playlist/song membership row.
    PlaylistSongId,
    "playlist_songs"
);
define_entity_id!(
    /// Identifier of a collaboration grant.
    CollaborationId,
    "collab"
);
define_entity_id!(
    /// Identifier of a like row.
    LikeId,
    "likes"
);
define_entity_id!(
    /// Identifier of a playlist activity record.
    ActivityId,
    "activity"
);
define_entity_id!(
    /// Identifier of a user.
    UserId,
    "user"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_carry_prefix() {
        assert!(AlbumId::new().as_str().starts_with("album-"));
        assert!(SongId::new().as_str().starts_with("song-"));
        assert!(PlaylistSongId::new().as_str().starts_with("playlist_songs-"));
        assert!(CollaborationId::new().has_expected_prefix());
    }

    #[test]
    fn test_prefix_check_rejects_lookalikes() {
        assert!(!AlbumId::from("albums-1").has_expected_prefix());
        assert!(!AlbumId::from("song-1").has_expected_prefix());
        assert!(AlbumId::from("album-1").has_expected_prefix());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: std::collections::HashSet<UserId> = (0..256).map(|_| UserId::new()).collect();
        assert_eq!(ids.len(), 256);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = AlbumId::from("album-1");
        let json = serde_json::to_string(&id).expect("serialize");
        assert_eq!(json, "\"album-1\"");
        let back: AlbumId = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, id);
    }
}
