//! Router tests for playlists, playlist songs, activities and
//! collaborations.

mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use support::TestApp;

/// `user-1` owns `playlist-1`, `user-2` exists without access, `song-1`
/// exists.
async fn scenario() -> TestApp {
    let app = TestApp::new();
    app.harness.seed_playlist_scenario().await.unwrap();
    app.harness
        .seed_song("song-1", "Viva la Vida", "Coldplay", None)
        .await
        .unwrap();
    app
}

#[tokio::test]
async fn playlist_routes_require_a_token() {
    let app = scenario().await;

    let list = app.get("/playlists").await;
    assert_eq!(list.status, StatusCode::UNAUTHORIZED);
    assert_eq!(list.body["code"], "UNAUTHORIZED");

    let create = app.post("/playlists", json!({ "name": "Sneaky" })).await;
    assert_eq!(create.status, StatusCode::UNAUTHORIZED);

    let collab = app
        .post(
            "/collaborations",
            json!({ "playlistId": "playlist-1", "userId": "user-2" }),
        )
        .await;
    assert_eq!(collab.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn created_playlist_is_listed_for_its_owner() {
    let app = scenario().await;

    let created = app
        .send_as("user-2", Method::POST, "/playlists", Some(json!({ "name": "Focus" })))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert!(created.body["playlistId"].as_str().is_some());

    let listed = app.get_as("user-2", "/playlists").await;
    let playlists = listed.body["playlists"].as_array().unwrap();
    assert_eq!(playlists.len(), 1);
    assert_eq!(playlists[0]["name"], "Focus");
    assert_eq!(playlists[0]["username"], "guest");
}

#[tokio::test]
async fn owner_adds_and_removes_songs_with_activity_log() {
    let app = scenario().await;

    let added = app
        .send_as(
            "user-1",
            Method::POST,
            "/playlists/playlist-1/songs",
            Some(json!({ "songId": "song-1" })),
        )
        .await;
    assert_eq!(added.status, StatusCode::CREATED);

    let detail = app.get_as("user-1", "/playlists/playlist-1/songs").await;
    assert_eq!(detail.status, StatusCode::OK);
    assert_eq!(detail.body["name"], "Road Trip");
    assert_eq!(detail.body["songs"][0]["id"], "song-1");

    let removed = app
        .send_as(
            "user-1",
            Method::DELETE,
            "/playlists/playlist-1/songs",
            Some(json!({ "songId": "song-1" })),
        )
        .await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);

    let activities = app.get_as("user-1", "/playlists/playlist-1/activities").await;
    assert_eq!(activities.body["playlistId"], "playlist-1");
    let log = activities.body["activities"].as_array().unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0]["action"], "add");
    assert_eq!(log[1]["action"], "delete");
    assert_eq!(log[0]["username"], "owner");
    assert_eq!(log[0]["title"], "Viva la Vida");
}

#[tokio::test]
async fn removing_an_absent_song_is_invariant() {
    let app = scenario().await;
    let response = app
        .send_as(
            "user-1",
            Method::DELETE,
            "/playlists/playlist-1/songs",
            Some(json!({ "songId": "song-1" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["code"], "INVARIANT_VIOLATION");
}

#[tokio::test]
async fn adding_a_missing_song_is_not_found() {
    let app = scenario().await;
    let response = app
        .send_as(
            "user-1",
            Method::POST,
            "/playlists/playlist-1/songs",
            Some(json!({ "songId": "song-404" })),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stranger_is_forbidden_and_missing_playlist_is_not_found() {
    let app = scenario().await;

    let forbidden = app.get_as("user-2", "/playlists/playlist-1/songs").await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(
        forbidden.body["message"],
        "You are not entitled to access this resource"
    );

    let missing = app.get_as("user-2", "/playlists/playlist-404/songs").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["message"], "Playlist not found");
}

#[tokio::test]
async fn collaborator_gets_access_but_cannot_delete() {
    let app = scenario().await;

    let granted = app
        .send_as(
            "user-1",
            Method::POST,
            "/collaborations",
            Some(json!({ "playlistId": "playlist-1", "userId": "user-2" })),
        )
        .await;
    assert_eq!(granted.status, StatusCode::CREATED);
    assert!(granted.body["collaborationId"].as_str().is_some());

    let added = app
        .send_as(
            "user-2",
            Method::POST,
            "/playlists/playlist-1/songs",
            Some(json!({ "songId": "song-1" })),
        )
        .await;
    assert_eq!(added.status, StatusCode::CREATED);

    let listed = app.get_as("user-2", "/playlists").await;
    let playlists = listed.body["playlists"].as_array().unwrap();
    assert_eq!(playlists.len(), 1);
    assert_eq!(playlists[0]["username"], "owner");

    let delete = app
        .send_as("user-2", Method::DELETE, "/playlists/playlist-1", None)
        .await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);

    // Collaborators cannot manage collaborators either.
    let regrant = app
        .send_as(
            "user-2",
            Method::POST,
            "/collaborations",
            Some(json!({ "playlistId": "playlist-1", "userId": "user-2" })),
        )
        .await;
    assert_eq!(regrant.status, StatusCode::FORBIDDEN);

    let owner_delete = app
        .send_as("user-1", Method::DELETE, "/playlists/playlist-1", None)
        .await;
    assert_eq!(owner_delete.status, StatusCode::NO_CONTENT);
    assert_eq!(
        app.get_as("user-2", "/playlists/playlist-1/songs").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn collaboration_errors() {
    let app = scenario().await;

    let missing_user = app
        .send_as(
            "user-1",
            Method::POST,
            "/collaborations",
            Some(json!({ "playlistId": "playlist-1", "userId": "user-404" })),
        )
        .await;
    assert_eq!(missing_user.status, StatusCode::NOT_FOUND);

    let body = json!({ "playlistId": "playlist-1", "userId": "user-2" });
    let first = app
        .send_as("user-1", Method::POST, "/collaborations", Some(body.clone()))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);
    let duplicate = app
        .send_as("user-1", Method::POST, "/collaborations", Some(body.clone()))
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);

    let revoked = app
        .send_as("user-1", Method::DELETE, "/collaborations", Some(body.clone()))
        .await;
    assert_eq!(revoked.status, StatusCode::NO_CONTENT);
    let again = app
        .send_as("user-1", Method::DELETE, "/collaborations", Some(body))
        .await;
    assert_eq!(again.status, StatusCode::BAD_REQUEST);

    let missing_field = app
        .send_as(
            "user-1",
            Method::POST,
            "/collaborations",
            Some(json!({ "playlistId": "playlist-1" })),
        )
        .await;
    assert_eq!(missing_field.body["code"], "MISSING_FIELD");
}

#[tokio::test]
async fn user_registration_and_lookup() {
    let app = TestApp::new();

    let created = app
        .post(
            "/users",
            json!({ "username": "dicoding", "password": "secret", "fullname": "Dicoding Indonesia" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let user_id = created.body["userId"].as_str().unwrap().to_string();

    let fetched = app.get(&format!("/users/{}", user_id)).await;
    assert_eq!(fetched.body["username"], "dicoding");
    assert!(fetched.body.get("password").is_none());

    let duplicate = app
        .post(
            "/users",
            json!({ "username": "dicoding", "password": "other", "fullname": "Someone Else" }),
        )
        .await;
    assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);

    let no_password = app
        .post("/users", json!({ "username": "nopass", "fullname": "No Password" }))
        .await;
    assert_eq!(no_password.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_password.body["code"], "MISSING_FIELD");

    assert_eq!(app.get("/users/user-404").await.status, StatusCode::NOT_FOUND);
}
