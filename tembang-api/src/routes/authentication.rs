//! Authentication REST API Routes
//!
//! Login issues an access token and a refresh token. The refresh token is
//! exchanged for new access tokens until it is deleted by logout.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use tembang_storage::CatalogStore;

use crate::{
    auth::AuthConfig,
    error::{ApiError, ApiResult},
    services,
    state::AppState,
    types::{
        required_text, AccessTokenResponse, LoginRequest, RefreshTokenRequest, TokenPairResponse,
    },
};

/// POST /authentications - Log in
#[utoipa::path(
    post,
    path = "/authentications",
    tag = "Authentications",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Logged in", body = TokenPairResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Wrong username or password", body = ApiError),
    ),
)]
pub async fn login(
    State(store): State<Arc<dyn CatalogStore>>,
    State(auth): State<Arc<AuthConfig>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let username = required_text(req.username, "username")?;
    let password = required_text(req.password, "password")?;
    let pair = services::login(store.as_ref(), &auth, &username, password).await?;
    Ok((
        StatusCode::CREATED,
        Json(TokenPairResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }),
    ))
}

/// PUT /authentications - Refresh the access token
#[utoipa::path(
    put,
    path = "/authentications",
    tag = "Authentications",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token", body = AccessTokenResponse),
        (status = 400, description = "Unknown or invalid refresh token", body = ApiError),
    ),
)]
pub async fn refresh(
    State(store): State<Arc<dyn CatalogStore>>,
    State(auth): State<Arc<AuthConfig>>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<Json<AccessTokenResponse>> {
    let refresh_token = required_text(req.refresh_token, "refreshToken")?;
    let access_token = services::refresh_access_token(store.as_ref(), &auth, &refresh_token).await?;
    Ok(Json(AccessTokenResponse { access_token }))
}

/// DELETE /authentications - Log out
#[utoipa::path(
    delete,
    path = "/authentications",
    tag = "Authentications",
    request_body = RefreshTokenRequest,
    responses(
        (status = 204, description = "Refresh token deleted"),
        (status = 400, description = "Unknown refresh token", body = ApiError),
    ),
)]
pub async fn logout(
    State(store): State<Arc<dyn CatalogStore>>,
    Json(req): Json<RefreshTokenRequest>,
) -> ApiResult<StatusCode> {
    let refresh_token = required_text(req.refresh_token, "refreshToken")?;
    services::logout(store.as_ref(), &refresh_token).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(login).put(refresh).delete(logout))
        .with_state(state)
}
