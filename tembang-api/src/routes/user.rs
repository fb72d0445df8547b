//! User REST API Routes
//!
//! Registration stores an Argon2id hash of the password. Profiles never
//! expose it.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tembang_core::{User, UserId};
use tembang_storage::CatalogStore;

use crate::{
    auth::hash_password,
    error::{ApiError, ApiResult},
    services::{add_user, get_user},
    state::AppState,
    types::{required_text, CreateUserRequest, UserCreatedResponse},
};

/// POST /users - Register a user
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User registered", body = UserCreatedResponse),
        (status = 400, description = "Username taken or invalid request", body = ApiError),
    ),
)]
pub async fn create_user(
    State(store): State<Arc<dyn CatalogStore>>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<impl IntoResponse> {
    let username = required_text(req.username, "username")?;
    let password = required_text(req.password, "password")?;
    let fullname = required_text(req.fullname, "fullname")?;
    let password_hash = hash_password(password).await?;
    let user_id = add_user(store.as_ref(), username, fullname, &password_hash).await?;
    Ok((StatusCode::CREATED, Json(UserCreatedResponse { user_id })))
}

/// GET /users/{id} - Get a user profile
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = User),
        (status = 404, description = "User not found", body = ApiError),
    ),
)]
pub async fn get_user_by_id(
    State(store): State<Arc<dyn CatalogStore>>,
    Path(id): Path<UserId>,
) -> ApiResult<Json<User>> {
    Ok(Json(get_user(store.as_ref(), &id).await?))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_user))
        .route("/:id", get(get_user_by_id))
        .with_state(state)
}
