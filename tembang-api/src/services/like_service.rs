//! Like Toggle Service
//!
//! Flips a user's like on an album. The existence check and the flip happen
//! inside one store call, so a pair never ends up with two like rows.

use tembang_core::{AlbumId, LikeState, TembangError, TembangResult, UserId};
use tembang_storage::{CacheKey, CacheRead, LikeToggleOutcome};

use crate::cached_db::CachedCatalog;

/// Toggles album likes and serves cached like counts.
#[derive(Debug, Clone)]
pub struct LikeToggleMutator {
    catalog: CachedCatalog,
}

/// Interpret the row counts of one toggle.
fn outcome_state(outcome: LikeToggleOutcome) -> TembangResult<LikeState> {
    match (outcome.removed, outcome.inserted) {
        (1, 0) => Ok(LikeState::NotLiked),
        (0, 1) => Ok(LikeState::Liked),
        (removed, inserted) => {
            tracing::warn!(removed, inserted, "Like toggle touched an unexpected number of rows");
            Err(TembangError::invariant(if removed == 0 {
                "Failed to add like"
            } else {
                "Failed to remove like"
            }))
        }
    }
}

impl LikeToggleMutator {
    pub fn new(catalog: CachedCatalog) -> Self {
        Self { catalog }
    }

    /// Like the album if the user does not like it yet, unlike it otherwise.
    ///
    /// The album must exist. `likes:<albumId>` is invalidated whenever the
    /// store call returns, including when the row counts are unexpected.
    pub async fn toggle_like(&self, album_id: &AlbumId, user_id: &UserId) -> TembangResult<LikeState> {
        self.catalog.album(album_id).await?;

        let outcome = self.catalog.like_toggle_raw(album_id, user_id).await;
        self.catalog
            .cache()
            .invalidate(&CacheKey::AlbumLikes(album_id.clone()))
            .await;

        let state = outcome_state(outcome?)?;
        tracing::info!(album_id = %album_id, user_id = %user_id, ?state, "Album like toggled");
        Ok(state)
    }

    /// Number of users who like the album.
    pub async fn like_count(&self, album_id: &AlbumId) -> TembangResult<CacheRead<u64>> {
        self.catalog.like_count(album_id).await
    }
}
