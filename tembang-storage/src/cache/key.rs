//! Cache key space.
//!
//! One key per logical query. Keys are only ever built through [`CacheKey`],
//! so a reader and the writers that invalidate it cannot disagree on the
//! spelling.

use std::fmt;

use tembang_core::AlbumId;

/// A cache key mirroring one durable-store query.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// `albums:list` - every album.
    AlbumList,
    /// `album:<id>` - a single album.
    Album(AlbumId),
    /// `album-songs:<id>` - songs whose album reference is `<id>`.
    AlbumSongs(AlbumId),
    /// `likes:<id>` - number of users who like the album.
    AlbumLikes(AlbumId),
}

impl CacheKey {
    /// Every key whose query result depends on the given album existing.
    pub fn album_scope(album_id: &AlbumId) -> [CacheKey; 4] {
        [
            CacheKey::AlbumList,
            CacheKey::Album(album_id.clone()),
            CacheKey::AlbumSongs(album_id.clone()),
            CacheKey::AlbumLikes(album_id.clone()),
        ]
    }

    /// Render the key as stored in the cache layer.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::AlbumList => f.write_str("albums:list"),
            CacheKey::Album(id) => write!(f, "album:{}", id),
            CacheKey::AlbumSongs(id) => write!(f, "album-songs:{}", id),
            CacheKey::AlbumLikes(id) => write!(f, "likes:{}", id),
        }
    }
}
