//! Router tests for the song catalog.

mod support;

use axum::http::{Method, StatusCode};
use serde_json::json;
use support::TestApp;

async fn create_song(app: &TestApp, title: &str, performer: &str) -> String {
    let response = app
        .post(
            "/songs",
            json!({ "title": title, "year": 2008, "performer": performer, "genre": "rock" }),
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    response.body["songId"].as_str().expect("songId").to_string()
}

#[tokio::test]
async fn song_without_title_is_untitled() {
    let app = TestApp::new();
    let response = app
        .post("/songs", json!({ "year": 2011, "performer": "Coldplay" }))
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let song_id = response.body["songId"].as_str().unwrap();
    let song = app.get(&format!("/songs/{}", song_id)).await;
    assert_eq!(song.status, StatusCode::OK);
    assert_eq!(song.body["title"], "untitled");
    assert_eq!(song.body["performer"], "Coldplay");
}

#[tokio::test]
async fn song_requires_year_and_performer() {
    let app = TestApp::new();

    let response = app.post("/songs", json!({ "title": "Yellow", "performer": "Coldplay" })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"]["field"], "year");

    let response = app.post("/songs", json!({ "title": "Yellow", "year": 2000 })).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["details"]["field"], "performer");
}

#[tokio::test]
async fn song_search_is_case_insensitive() {
    let app = TestApp::new();
    create_song(&app, "Fix You", "Coldplay").await;
    create_song(&app, "Fix Me", "Paramore").await;
    create_song(&app, "Clocks", "Coldplay").await;

    let by_title = app.get("/songs?title=fIx").await;
    assert_eq!(by_title.status, StatusCode::OK);
    assert_eq!(by_title.body["songs"].as_array().map(Vec::len), Some(2));

    let both = app.get("/songs?title=fix&performer=COLD").await;
    let songs = both.body["songs"].as_array().unwrap();
    assert_eq!(songs.len(), 1);
    assert_eq!(songs[0]["title"], "Fix You");

    let all = app.get("/songs").await;
    assert_eq!(all.body["songs"].as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn empty_song_search_is_not_found() {
    let app = TestApp::new();
    create_song(&app, "Clocks", "Coldplay").await;

    let response = app.get("/songs?title=nothing-matches").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn song_update_and_delete() {
    let app = TestApp::new();
    let song_id = create_song(&app, "Trouble", "Coldplay").await;
    let uri = format!("/songs/{}", song_id);

    let update = app
        .send(
            Method::PUT,
            &uri,
            None,
            Some(json!({ "title": "Trouble (Live)", "year": 2003, "performer": "Coldplay" })),
        )
        .await;
    assert_eq!(update.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get(&uri).await.body["title"], "Trouble (Live)");

    let delete = app.send(Method::DELETE, &uri, None, None).await;
    assert_eq!(delete.status, StatusCode::NO_CONTENT);
    assert_eq!(app.get(&uri).await.status, StatusCode::NOT_FOUND);

    let again = app.send(Method::DELETE, &uri, None, None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn moving_a_song_refreshes_both_album_listings() {
    let app = TestApp::new();
    app.harness.seed_album("album-a", "Parachutes").await.unwrap();
    app.harness.seed_album("album-b", "X&Y").await.unwrap();

    let created = app
        .post(
            "/songs",
            json!({ "title": "Yellow", "year": 2000, "performer": "Coldplay", "albumId": "album-a" }),
        )
        .await;
    let song_id = created.body["songId"].as_str().unwrap().to_string();

    // Warm both album entries.
    assert_eq!(app.get("/albums/album-a").await.body["songs"].as_array().map(Vec::len), Some(1));
    assert_eq!(app.get("/albums/album-b").await.body["songs"].as_array().map(Vec::len), Some(0));

    let moved = app
        .send(
            Method::PUT,
            &format!("/songs/{}", song_id),
            None,
            Some(json!({ "title": "Yellow", "year": 2000, "performer": "Coldplay", "albumId": "album-b" })),
        )
        .await;
    assert_eq!(moved.status, StatusCode::NO_CONTENT);

    assert_eq!(app.get("/albums/album-a").await.body["songs"].as_array().map(Vec::len), Some(0));
    assert_eq!(app.get("/albums/album-b").await.body["songs"].as_array().map(Vec::len), Some(1));
}
