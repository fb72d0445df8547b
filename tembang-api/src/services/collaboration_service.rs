//! Collaboration Service
//!
//! Grants and revokes collaborator access. Only the playlist owner may do
//! either.

use tembang_core::{
    Collaboration, CollaborationId, EntityType, PlaylistId, TembangError, TembangResult, UserId,
};
use tembang_storage::CatalogStore;

use super::PlaylistAccessResolver;

/// Grant `collaborator` access to the playlist.
///
/// # Errors
/// - `NotFound` if the playlist or the collaborator does not exist
/// - `Authorization` if `owner` does not own the playlist
/// - `Invariant` if the pair already collaborates
pub async fn add_collaborator(
    store: &dyn CatalogStore,
    access: &PlaylistAccessResolver,
    playlist_id: &PlaylistId,
    owner: &UserId,
    collaborator: &UserId,
) -> TembangResult<CollaborationId> {
    access.verify_playlist_owner(playlist_id, owner).await?;
    if store.user_get(collaborator).await?.is_none() {
        return Err(TembangError::not_found(EntityType::User, "User not found"));
    }

    let collaboration = Collaboration {
        id: CollaborationId::new(),
        playlist_id: playlist_id.clone(),
        user_id: collaborator.clone(),
    };
    store.collaboration_insert(&collaboration).await?;
    tracing::info!(playlist_id = %playlist_id, user_id = %collaborator, "Collaborator added");
    Ok(collaboration.id)
}

/// Revoke a collaborator's access.
pub async fn remove_collaborator(
    store: &dyn CatalogStore,
    access: &PlaylistAccessResolver,
    playlist_id: &PlaylistId,
    owner: &UserId,
    collaborator: &UserId,
) -> TembangResult<()> {
    access.verify_playlist_owner(playlist_id, owner).await?;
    if !store.collaboration_delete(playlist_id, collaborator).await? {
        return Err(TembangError::invariant("Failed to delete collaboration"));
    }
    tracing::info!(playlist_id = %playlist_id, user_id = %collaborator, "Collaborator removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tembang_core::{Playlist, User};
    use tembang_storage::InMemoryCatalogStore;

    async fn setup() -> (Arc<InMemoryCatalogStore>, PlaylistAccessResolver, PlaylistId) {
        let store = Arc::new(InMemoryCatalogStore::new());
        for name in ["user-1", "user-2"] {
            store
                .user_insert(
                    &User {
                        id: UserId::from(name),
                        username: name.into(),
                        fullname: name.into(),
                    },
                    "password-hash",
                )
                .await
                .unwrap();
        }
        let playlist = PlaylistId::from("playlist-1");
        store
            .playlist_insert(&Playlist {
                id: playlist.clone(),
                name: "Shared".into(),
                owner: UserId::from("user-1"),
            })
            .await
            .unwrap();
        let access = PlaylistAccessResolver::new(store.clone());
        (store, access, playlist)
    }

    #[tokio::test]
    async fn test_grant_then_revoke() {
        let (store, access, playlist) = setup().await;
        let owner = UserId::from("user-1");
        let guest = UserId::from("user-2");

        add_collaborator(store.as_ref(), &access, &playlist, &owner, &guest)
            .await
            .unwrap();
        access.verify_playlist_access(&playlist, &guest).await.unwrap();

        let dup = add_collaborator(store.as_ref(), &access, &playlist, &owner, &guest)
            .await
            .unwrap_err();
        assert!(dup.is_invariant());

        remove_collaborator(store.as_ref(), &access, &playlist, &owner, &guest)
            .await
            .unwrap();
        assert!(access
            .verify_playlist_access(&playlist, &guest)
            .await
            .unwrap_err()
            .is_authorization());

        let again = remove_collaborator(store.as_ref(), &access, &playlist, &owner, &guest)
            .await
            .unwrap_err();
        assert!(again.is_invariant());
    }

    #[tokio::test]
    async fn test_collaborator_cannot_grant() {
        let (store, access, playlist) = setup().await;
        let owner = UserId::from("user-1");
        let guest = UserId::from("user-2");
        add_collaborator(store.as_ref(), &access, &playlist, &owner, &guest)
            .await
            .unwrap();

        let err = add_collaborator(store.as_ref(), &access, &playlist, &guest, &owner)
            .await
            .unwrap_err();
        assert!(err.is_authorization());
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let (store, access, playlist) = setup().await;
        let err = add_collaborator(
            store.as_ref(),
            &access,
            &playlist,
            &UserId::from("user-1"),
            &UserId::from("user-404"),
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());
    }
}
