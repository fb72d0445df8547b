//! Authentication Service
//!
//! Login with username and password, access token refresh and logout.
//! Refresh tokens are valid only while stored; logout deletes them.

use tembang_core::{TembangError, TembangResult, UserId};
use tembang_storage::CatalogStore;

use crate::auth::{
    generate_jwt_token, generate_refresh_token, validate_refresh_token, verify_password,
    AuthConfig,
};
use crate::error::ApiResult;

const BAD_CREDENTIALS: &str = "The credentials you provided are incorrect";
const BAD_REFRESH_TOKEN: &str = "Refresh token is invalid";

/// Access and refresh token issued at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Resolve a username and password to the user id. An unknown username and
/// a wrong password fail the same way.
pub async fn verify_user_credential(
    store: &dyn CatalogStore,
    username: &str,
    password: String,
) -> ApiResult<UserId> {
    let Some(credential) = store.user_credential(username).await? else {
        return Err(TembangError::authentication(BAD_CREDENTIALS).into());
    };
    if !verify_password(password, credential.password_hash).await? {
        return Err(TembangError::authentication(BAD_CREDENTIALS).into());
    }
    Ok(credential.user_id)
}

/// Check credentials and issue a token pair. The refresh token is stored.
pub async fn login(
    store: &dyn CatalogStore,
    auth: &AuthConfig,
    username: &str,
    password: String,
) -> ApiResult<TokenPair> {
    let user_id = verify_user_credential(store, username, password).await?;
    let access_token = generate_jwt_token(auth, &user_id)?;
    let refresh_token = generate_refresh_token(auth, &user_id)?;
    store.refresh_token_insert(&refresh_token).await?;

    tracing::info!(user_id = %user_id, "User logged in");
    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Exchange a stored refresh token for a new access token.
pub async fn refresh_access_token(
    store: &dyn CatalogStore,
    auth: &AuthConfig,
    refresh_token: &str,
) -> ApiResult<String> {
    verify_stored_refresh_token(store, refresh_token).await?;
    let claims = validate_refresh_token(auth, refresh_token)
        .map_err(|_| TembangError::invariant(BAD_REFRESH_TOKEN))?;
    generate_jwt_token(auth, &claims.user_id())
}

/// Forget a stored refresh token.
pub async fn logout(store: &dyn CatalogStore, refresh_token: &str) -> ApiResult<()> {
    verify_stored_refresh_token(store, refresh_token).await?;
    store.refresh_token_delete(refresh_token).await?;
    Ok(())
}

async fn verify_stored_refresh_token(store: &dyn CatalogStore, token: &str) -> TembangResult<()> {
    if store.refresh_token_exists(token).await? {
        Ok(())
    } else {
        Err(TembangError::invariant(BAD_REFRESH_TOKEN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{hash_password, validate_jwt_token, JwtSecret};
    use crate::error::ErrorCode;
    use crate::services::add_user;
    use tembang_storage::InMemoryCatalogStore;

    fn auth() -> AuthConfig {
        AuthConfig {
            jwt_secret: JwtSecret::new("access-secret".to_string()).unwrap(),
            refresh_secret: JwtSecret::new("refresh-secret".to_string()).unwrap(),
            ..AuthConfig::default()
        }
    }

    async fn registered() -> (InMemoryCatalogStore, UserId) {
        let store = InMemoryCatalogStore::new();
        let hash = hash_password("secret".to_string()).await.unwrap();
        let id = add_user(&store, "dicoding".into(), "Dicoding".into(), &hash)
            .await
            .unwrap();
        (store, id)
    }

    #[tokio::test]
    async fn test_login_issues_usable_tokens() {
        let (store, user_id) = registered().await;
        let auth = auth();

        let pair = login(&store, &auth, "dicoding", "secret".into()).await.unwrap();
        assert_eq!(validate_jwt_token(&auth, &pair.access_token).unwrap().user_id(), user_id);
        assert!(store.refresh_token_exists(&pair.refresh_token).await.unwrap());

        let access = refresh_access_token(&store, &auth, &pair.refresh_token)
            .await
            .unwrap();
        assert_eq!(validate_jwt_token(&auth, &access).unwrap().user_id(), user_id);
    }

    #[tokio::test]
    async fn test_bad_credentials_are_unauthorized() {
        let (store, _) = registered().await;
        let auth = auth();

        for (username, password) in [("dicoding", "wrong"), ("nobody", "secret")] {
            let err = login(&store, &auth, username, password.into()).await.unwrap_err();
            assert_eq!(err.code, ErrorCode::Unauthorized);
            assert_eq!(err.message, BAD_CREDENTIALS);
        }
    }

    #[tokio::test]
    async fn test_logged_out_token_cannot_refresh() {
        let (store, _) = registered().await;
        let auth = auth();
        let pair = login(&store, &auth, "dicoding", "secret".into()).await.unwrap();

        logout(&store, &pair.refresh_token).await.unwrap();
        let err = refresh_access_token(&store, &auth, &pair.refresh_token)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvariantViolation);
        assert_eq!(
            logout(&store, &pair.refresh_token).await.unwrap_err().code,
            ErrorCode::InvariantViolation
        );
    }

    #[tokio::test]
    async fn test_stored_token_with_bad_signature_is_invariant() {
        let store = InMemoryCatalogStore::new();
        store.refresh_token_insert("not-a-jwt").await.unwrap();

        let err = refresh_access_token(&store, &auth(), "not-a-jwt")
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvariantViolation);
    }
}
