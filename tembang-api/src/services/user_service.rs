//! User Service

use tembang_core::{EntityType, TembangError, TembangResult, User, UserId};
use tembang_storage::CatalogStore;

/// Register a user with an already hashed password. Usernames are unique.
pub async fn add_user(
    store: &dyn CatalogStore,
    username: String,
    fullname: String,
    password_hash: &str,
) -> TembangResult<UserId> {
    if store.user_get_by_username(&username).await?.is_some() {
        return Err(TembangError::invariant(
            "Failed to add user: username is already taken",
        ));
    }
    let user = User {
        id: UserId::new(),
        username,
        fullname,
    };
    // The unique constraint still catches a concurrent registration.
    store.user_insert(&user, password_hash).await?;
    Ok(user.id)
}

pub async fn get_user(store: &dyn CatalogStore, id: &UserId) -> TembangResult<User> {
    store
        .user_get(id)
        .await?
        .ok_or_else(|| TembangError::not_found(EntityType::User, "User not found"))
}
