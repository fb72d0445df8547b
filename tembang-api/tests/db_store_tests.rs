//! PostgreSQL store tests. Require a database with `sql/schema.sql` applied
//! and the `db-tests` feature:
//!
//!   cargo test -p tembang-api --features db-tests --test db_store_tests

#![cfg(feature = "db-tests")]

use tembang_api::{DbClient, DbConfig};
use tembang_core::{AlbumId, UserId};
use tembang_storage::{CatalogStore, LikeToggleOutcome};
use tembang_test_utils::fixtures;

fn test_db() -> DbClient {
    DbClient::from_config(&DbConfig::from_env()).expect("Failed to create database client")
}

#[tokio::test]
async fn like_toggle_flips_a_single_row() {
    let db = test_db();
    let album = fixtures::album(&AlbumId::new().to_string(), "Ghost Stories", 2014);
    let user = fixtures::user(&UserId::new().to_string(), &format!("u{}", UserId::new()));
    db.album_insert(&album).await.unwrap();
    db.user_insert(&user, fixtures::UNUSABLE_PASSWORD_HASH).await.unwrap();

    let first = db.like_toggle(&album.id, &user.id).await.unwrap();
    assert_eq!(first, LikeToggleOutcome::inserted());
    assert_eq!(db.likes_by_album(&album.id).await.unwrap(), vec![user.id.clone()]);

    let second = db.like_toggle(&album.id, &user.id).await.unwrap();
    assert_eq!(second, LikeToggleOutcome::removed());
    assert!(db.likes_by_album(&album.id).await.unwrap().is_empty());

    assert!(db.album_delete(&album.id).await.unwrap());
}

#[tokio::test]
async fn duplicate_username_is_invariant() {
    let db = test_db();
    let username = format!("dup{}", UserId::new());
    db.user_insert(
        &fixtures::user(&UserId::new().to_string(), &username),
        fixtures::UNUSABLE_PASSWORD_HASH,
    )
    .await
    .unwrap();

    let err = db
        .user_insert(
            &fixtures::user(&UserId::new().to_string(), &username),
            fixtures::UNUSABLE_PASSWORD_HASH,
        )
        .await
        .unwrap_err();
    assert!(err.is_invariant());
}

#[tokio::test]
async fn credentials_and_refresh_tokens_round_trip() {
    let db = test_db();
    let user = fixtures::user(&UserId::new().to_string(), &format!("u{}", UserId::new()));
    db.user_insert(&user, "$argon2id$stored").await.unwrap();

    let credential = db.user_credential(&user.username).await.unwrap().unwrap();
    assert_eq!(credential.user_id, user.id);
    assert_eq!(credential.password_hash, "$argon2id$stored");

    let token = format!("rt-{}", UserId::new());
    db.refresh_token_insert(&token).await.unwrap();
    assert!(db.refresh_token_exists(&token).await.unwrap());
    assert!(db.refresh_token_delete(&token).await.unwrap());
    assert!(!db.refresh_token_exists(&token).await.unwrap());
}

#[tokio::test]
async fn ping_reaches_the_database() {
    test_db().ping().await.unwrap();
}
