//! Playlist Access Service
//!
//! Decides whether a user may act on a playlist. Resolution walks a fixed
//! sequence of checks and produces one [`AccessDecision`]:
//!
//! ```text
//! CheckExists ──missing──▶ Denied(PlaylistMissing)
//!      │
//!      ▼
//! CheckOwner ──owner──▶ Owner
//!      │
//!      ▼ (not owner)
//! CheckCollaborator ──row found──▶ Collaborator
//!      │
//!      ▼ (no row, or lookup failed)
//! Denied(NotOwner)
//! ```
//!
//! `PlaylistMissing` always wins over `NotOwner`, and a failed collaborator
//! lookup is reported as the ownership denial, never as its own error.

use std::sync::Arc;

use tembang_core::{EntityType, Playlist, PlaylistId, TembangError, TembangResult, UserId};
use tembang_storage::CatalogStore;

/// Why access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    PlaylistMissing,
    NotOwner,
}

/// Outcome of resolving a (playlist, user) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Owner,
    Collaborator,
    Denied(DenialReason),
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        !matches!(self, AccessDecision::Denied(_))
    }

    /// Convert to a result. Denials map by fixed priority:
    /// a missing playlist is `NotFound`, anything else is `Authorization`.
    pub fn into_result(self) -> TembangResult<AccessGrant> {
        match self {
            AccessDecision::Owner => Ok(AccessGrant::Owner),
            AccessDecision::Collaborator => Ok(AccessGrant::Collaborator),
            AccessDecision::Denied(DenialReason::PlaylistMissing) => Err(
                TembangError::not_found(EntityType::Playlist, "Playlist not found"),
            ),
            AccessDecision::Denied(DenialReason::NotOwner) => Err(TembangError::authorization(
                "You are not entitled to access this resource",
            )),
        }
    }
}

/// How a granted user reached the playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessGrant {
    Owner,
    Collaborator,
}

/// Resolution step. Each step either decides or hands off to the next.
#[derive(Debug)]
enum AccessStep {
    CheckExists,
    CheckOwner(Playlist),
    CheckCollaborator,
    Decided(AccessDecision),
}

/// Resolves playlist access for owners and collaborators.
#[derive(Clone)]
pub struct PlaylistAccessResolver {
    store: Arc<dyn CatalogStore>,
}

impl PlaylistAccessResolver {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }

    /// Run the full check sequence, falling back to collaborators.
    ///
    /// Only a failure to read the playlist itself is returned as an error.
    pub async fn resolve(
        &self,
        playlist_id: &PlaylistId,
        user_id: &UserId,
    ) -> TembangResult<AccessDecision> {
        self.run(playlist_id, user_id, true).await
    }

    /// Read or mutate access: owner or collaborator.
    pub async fn verify_playlist_access(
        &self,
        playlist_id: &PlaylistId,
        user_id: &UserId,
    ) -> TembangResult<AccessGrant> {
        let decision = self.resolve(playlist_id, user_id).await?;
        tracing::debug!(playlist_id = %playlist_id, user_id = %user_id, ?decision, "Playlist access resolved");
        decision.into_result()
    }

    /// Strict ownership check for destructive operations. Collaborators are
    /// refused.
    pub async fn verify_playlist_owner(
        &self,
        playlist_id: &PlaylistId,
        user_id: &UserId,
    ) -> TembangResult<()> {
        self.run(playlist_id, user_id, false)
            .await?
            .into_result()
            .map(|_| ())
    }

    async fn run(
        &self,
        playlist_id: &PlaylistId,
        user_id: &UserId,
        allow_collaborators: bool,
    ) -> TembangResult<AccessDecision> {
        let mut step = AccessStep::CheckExists;
        loop {
            step = match step {
                AccessStep::CheckExists => match self.store.playlist_get(playlist_id).await? {
                    Some(playlist) => AccessStep::CheckOwner(playlist),
                    None => AccessStep::Decided(AccessDecision::Denied(
                        DenialReason::PlaylistMissing,
                    )),
                },
                AccessStep::CheckOwner(playlist) if &playlist.owner == user_id => {
                    AccessStep::Decided(AccessDecision::Owner)
                }
                AccessStep::CheckOwner(_) if allow_collaborators => AccessStep::CheckCollaborator,
                AccessStep::CheckOwner(_) => {
                    AccessStep::Decided(AccessDecision::Denied(DenialReason::NotOwner))
                }
                AccessStep::CheckCollaborator => {
                    match self.store.collaboration_exists(playlist_id, user_id).await {
                        Ok(true) => AccessStep::Decided(AccessDecision::Collaborator),
                        Ok(false) => {
                            AccessStep::Decided(AccessDecision::Denied(DenialReason::NotOwner))
                        }
                        Err(e) => {
                            tracing::warn!(
                                playlist_id = %playlist_id,
                                user_id = %user_id,
                                error = %e,
                                "Collaborator lookup failed, treating as not entitled"
                            );
                            AccessStep::Decided(AccessDecision::Denied(DenialReason::NotOwner))
                        }
                    }
                }
                AccessStep::Decided(decision) => return Ok(decision),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tembang_core::{Collaboration, CollaborationId, User};
    use tembang_storage::InMemoryCatalogStore;

    async fn seeded() -> (PlaylistAccessResolver, PlaylistId) {
        let store = InMemoryCatalogStore::new();
        for name in ["user-1", "user-2", "user-3"] {
            store
                .user_insert(
                    &User {
                        id: UserId::from(name),
                        username: name.to_string(),
                        fullname: name.to_uppercase(),
                    },
                    "password-hash",
                )
                .await
                .unwrap();
        }
        let playlist_id = PlaylistId::from("playlist-1");
        store
            .playlist_insert(&Playlist {
                id: playlist_id.clone(),
                name: "Road trip".into(),
                owner: UserId::from("user-1"),
            })
            .await
            .unwrap();
        store
            .collaboration_insert(&Collaboration {
                id: CollaborationId::new(),
                playlist_id: playlist_id.clone(),
                user_id: UserId::from("user-2"),
            })
            .await
            .unwrap();
        (PlaylistAccessResolver::new(Arc::new(store)), playlist_id)
    }

    #[tokio::test]
    async fn test_owner_and_collaborator_are_granted() {
        let (resolver, playlist) = seeded().await;
        assert_eq!(
            resolver
                .verify_playlist_access(&playlist, &UserId::from("user-1"))
                .await
                .unwrap(),
            AccessGrant::Owner
        );
        assert_eq!(
            resolver
                .verify_playlist_access(&playlist, &UserId::from("user-2"))
                .await
                .unwrap(),
            AccessGrant::Collaborator
        );
    }

    #[tokio::test]
    async fn test_stranger_gets_ownership_denial() {
        let (resolver, playlist) = seeded().await;
        let err = resolver
            .verify_playlist_access(&playlist, &UserId::from("user-3"))
            .await
            .unwrap_err();
        assert!(err.is_authorization());
    }

    #[tokio::test]
    async fn test_missing_playlist_wins_over_everything() {
        let (resolver, _) = seeded().await;
        for user in ["user-1", "user-2", "user-3"] {
            let err = resolver
                .verify_playlist_access(&PlaylistId::from("playlist-404"), &UserId::from(user))
                .await
                .unwrap_err();
            assert!(err.is_not_found());
        }
    }

    #[tokio::test]
    async fn test_owner_check_refuses_collaborator() {
        let (resolver, playlist) = seeded().await;
        resolver
            .verify_playlist_owner(&playlist, &UserId::from("user-1"))
            .await
            .unwrap();
        let err = resolver
            .verify_playlist_owner(&playlist, &UserId::from("user-2"))
            .await
            .unwrap_err();
        assert!(err.is_authorization());
    }

    #[test]
    fn test_decision_priority() {
        assert!(AccessDecision::Denied(DenialReason::PlaylistMissing)
            .into_result()
            .unwrap_err()
            .is_not_found());
        assert!(AccessDecision::Denied(DenialReason::NotOwner)
            .into_result()
            .unwrap_err()
            .is_authorization());
        assert!(AccessDecision::Collaborator.is_granted());
    }
}
