//! Router tests for registration, login, token refresh and logout.

mod support;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use support::{TestApp, TestResponse};

async fn register(app: &TestApp, username: &str, password: &str) -> String {
    let created = app
        .post(
            "/users",
            json!({ "username": username, "password": password, "fullname": "Test User" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    created.body["userId"]
        .as_str()
        .expect("user id")
        .to_string()
}

async fn login(app: &TestApp, username: &str, password: &str) -> TestResponse {
    app.post(
        "/authentications",
        json!({ "username": username, "password": password }),
    )
    .await
}

fn text(body: &Value, field: &str) -> String {
    body[field].as_str().expect(field).to_string()
}

#[tokio::test]
async fn login_refresh_and_logout() {
    let app = TestApp::new();
    register(&app, "dicoding", "secret").await;

    let logged_in = login(&app, "dicoding", "secret").await;
    assert_eq!(logged_in.status, StatusCode::CREATED);
    let access_token = text(&logged_in.body, "accessToken");
    let refresh_token = text(&logged_in.body, "refreshToken");

    let playlists = app
        .send(Method::GET, "/playlists", Some(&access_token), None)
        .await;
    assert_eq!(playlists.status, StatusCode::OK);

    let refreshed = app
        .send(
            Method::PUT,
            "/authentications",
            None,
            Some(json!({ "refreshToken": refresh_token })),
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::OK);
    let renewed = text(&refreshed.body, "accessToken");
    let playlists = app.send(Method::GET, "/playlists", Some(&renewed), None).await;
    assert_eq!(playlists.status, StatusCode::OK);

    let logged_out = app
        .send(
            Method::DELETE,
            "/authentications",
            None,
            Some(json!({ "refreshToken": refresh_token })),
        )
        .await;
    assert_eq!(logged_out.status, StatusCode::NO_CONTENT);

    let stale = app
        .send(
            Method::PUT,
            "/authentications",
            None,
            Some(json!({ "refreshToken": refresh_token })),
        )
        .await;
    assert_eq!(stale.status, StatusCode::BAD_REQUEST);
    assert_eq!(stale.body["code"], "INVARIANT_VIOLATION");

    let second_logout = app
        .send(
            Method::DELETE,
            "/authentications",
            None,
            Some(json!({ "refreshToken": refresh_token })),
        )
        .await;
    assert_eq!(second_logout.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bad_credentials_are_unauthorized() {
    let app = TestApp::new();
    register(&app, "dicoding", "secret").await;

    let wrong_password = login(&app, "dicoding", "not-the-secret").await;
    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body["code"], "UNAUTHORIZED");

    let unknown_user = login(&app, "nobody", "secret").await;
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.body["message"], wrong_password.body["message"]);
}

#[tokio::test]
async fn login_requires_both_fields() {
    let app = TestApp::new();

    let missing = app
        .post("/authentications", json!({ "username": "dicoding" }))
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["code"], "MISSING_FIELD");

    let no_token = app
        .send(Method::PUT, "/authentications", None, Some(json!({})))
        .await;
    assert_eq!(no_token.body["code"], "MISSING_FIELD");
}

#[tokio::test]
async fn access_token_is_not_a_refresh_token() {
    let app = TestApp::new();
    let user_id = register(&app, "dicoding", "secret").await;
    let access_token = app.token_for(&user_id);

    let refreshed = app
        .send(
            Method::PUT,
            "/authentications",
            None,
            Some(json!({ "refreshToken": access_token })),
        )
        .await;
    assert_eq!(refreshed.status, StatusCode::BAD_REQUEST);
    assert_eq!(refreshed.body["code"], "INVARIANT_VIOLATION");
}
