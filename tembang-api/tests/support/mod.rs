//! Shared setup for router tests: an in-memory store, a cache layer and
//! the full application router.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tembang_api::{auth::generate_jwt_token, create_api_router, ApiConfig, AppState, AuthConfig};
use tembang_core::UserId;
use tembang_storage::{CacheConfig, CacheLayer};
use tembang_test_utils::harness::CatalogHarness;
use tower::ServiceExt;

pub struct TestApp {
    pub router: Router,
    pub harness: CatalogHarness,
    pub auth: AuthConfig,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn from_cache(&self) -> bool {
        self.headers
            .get("x-data-source")
            .is_some_and(|v| v == "cache")
    }
}

fn test_auth_config() -> AuthConfig {
    let mut config = AuthConfig::default();
    config.jwt_secret = tembang_api::auth::JwtSecret::new(
        "router-test-secret-with-enough-length-0123456789".to_string(),
    )
    .expect("valid secret");
    config.refresh_secret = tembang_api::auth::JwtSecret::new(
        "router-test-refresh-secret-with-enough-length-0123".to_string(),
    )
    .expect("valid secret");
    config
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_harness(CatalogHarness::new())
    }

    pub fn with_layer(layer: Arc<dyn CacheLayer>) -> Self {
        Self::with_harness(CatalogHarness::with_layer(layer))
    }

    fn with_harness(harness: CatalogHarness) -> Self {
        let auth = test_auth_config();
        let state = AppState::new(
            harness.store(),
            Arc::clone(&harness.layer),
            CacheConfig::default(),
            auth.clone(),
        );
        let router = create_api_router(state, &ApiConfig::default());
        Self {
            router,
            harness,
            auth,
        }
    }

    pub fn token_for(&self, user_id: &str) -> String {
        generate_jwt_token(&self.auth, &UserId::from(user_id)).expect("token")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, None, Some(body)).await
    }

    pub async fn get_as(&self, user_id: &str, uri: &str) -> TestResponse {
        let token = self.token_for(user_id);
        self.send(Method::GET, uri, Some(&token), None).await
    }

    pub async fn send_as(
        &self,
        user_id: &str,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> TestResponse {
        let token = self.token_for(user_id);
        self.send(method, uri, Some(&token), body).await
    }
}
