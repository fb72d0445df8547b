//! Album REST API Routes
//!
//! Album CRUD, cover registration and likes. Reads are served through the
//! cache and marked with `X-Data-Source: cache` when they were.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tembang_core::AlbumId;

use super::cached_response;
use crate::{
    cached_db::CachedCatalog,
    error::{ApiError, ApiResult},
    middleware::{auth_middleware, AuthExtractor, AuthMiddlewareState},
    services::LikeToggleMutator,
    state::AppState,
    types::{
        required_text, AlbumCreatedResponse, AlbumDetail, AlbumListResponse, AlbumRequest,
        CoverRequest, LikeCountResponse, LikeToggleResponse,
    },
};

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// POST /albums - Create an album
#[utoipa::path(
    post,
    path = "/albums",
    tag = "Albums",
    request_body = AlbumRequest,
    responses(
        (status = 201, description = "Album created", body = AlbumCreatedResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    ),
)]
pub async fn create_album(
    State(catalog): State<CachedCatalog>,
    Json(req): Json<AlbumRequest>,
) -> ApiResult<impl IntoResponse> {
    let album_id = catalog.album_add(req.into_input()?).await?;
    Ok((StatusCode::CREATED, Json(AlbumCreatedResponse { album_id })))
}

/// GET /albums - List every album
#[utoipa::path(
    get,
    path = "/albums",
    tag = "Albums",
    responses(
        (status = 200, description = "All albums", body = AlbumListResponse),
    ),
)]
pub async fn list_albums(State(catalog): State<CachedCatalog>) -> ApiResult<Response> {
    let read = catalog.albums().await?;
    Ok(cached_response(read.map(|albums| AlbumListResponse { albums })))
}

/// GET /albums/{id} - Album with its songs
#[utoipa::path(
    get,
    path = "/albums/{id}",
    tag = "Albums",
    params(("id" = String, Path, description = "Album ID")),
    responses(
        (status = 200, description = "Album details", body = AlbumDetail),
        (status = 404, description = "Album not found", body = ApiError),
    ),
)]
pub async fn get_album(
    State(catalog): State<CachedCatalog>,
    Path(id): Path<AlbumId>,
) -> ApiResult<Response> {
    Ok(cached_response(catalog.album_detail(&id).await?))
}

/// PUT /albums/{id} - Replace name and year
#[utoipa::path(
    put,
    path = "/albums/{id}",
    tag = "Albums",
    params(("id" = String, Path, description = "Album ID")),
    request_body = AlbumRequest,
    responses(
        (status = 204, description = "Album updated"),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Album not found", body = ApiError),
    ),
)]
pub async fn update_album(
    State(catalog): State<CachedCatalog>,
    Path(id): Path<AlbumId>,
    Json(req): Json<AlbumRequest>,
) -> ApiResult<StatusCode> {
    catalog.album_edit(&id, &req.into_input()?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /albums/{id} - Delete an album
#[utoipa::path(
    delete,
    path = "/albums/{id}",
    tag = "Albums",
    params(("id" = String, Path, description = "Album ID")),
    responses(
        (status = 204, description = "Album deleted"),
        (status = 404, description = "Album not found", body = ApiError),
    ),
)]
pub async fn delete_album(
    State(catalog): State<CachedCatalog>,
    Path(id): Path<AlbumId>,
) -> ApiResult<StatusCode> {
    catalog.album_remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /albums/{id}/covers - Record the uploaded cover's URL
#[utoipa::path(
    post,
    path = "/albums/{id}/covers",
    tag = "Albums",
    params(("id" = String, Path, description = "Album ID")),
    request_body = CoverRequest,
    responses(
        (status = 201, description = "Cover recorded"),
        (status = 400, description = "Album missing or invalid request", body = ApiError),
    ),
)]
pub async fn add_cover(
    State(catalog): State<CachedCatalog>,
    Path(id): Path<AlbumId>,
    Json(req): Json<CoverRequest>,
) -> ApiResult<StatusCode> {
    let cover_url = required_text(req.cover_url, "coverUrl")?;
    catalog.album_set_cover(&id, &cover_url).await?;
    Ok(StatusCode::CREATED)
}

/// POST /albums/{id}/likes - Toggle the caller's like
#[utoipa::path(
    post,
    path = "/albums/{id}/likes",
    tag = "Albums",
    params(("id" = String, Path, description = "Album ID")),
    responses(
        (status = 201, description = "Like toggled", body = LikeToggleResponse),
        (status = 400, description = "Toggle could not be applied", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
        (status = 404, description = "Album not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn toggle_like(
    State(likes): State<LikeToggleMutator>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<AlbumId>,
) -> ApiResult<impl IntoResponse> {
    let state = likes.toggle_like(&id, &auth.user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(LikeToggleResponse {
            album_id: id,
            state,
        }),
    ))
}

/// GET /albums/{id}/likes - Number of likes
#[utoipa::path(
    get,
    path = "/albums/{id}/likes",
    tag = "Albums",
    params(("id" = String, Path, description = "Album ID")),
    responses(
        (status = 200, description = "Like count", body = LikeCountResponse),
    ),
)]
pub async fn like_count(
    State(likes): State<LikeToggleMutator>,
    Path(id): Path<AlbumId>,
) -> ApiResult<Response> {
    let read = likes.like_count(&id).await?;
    Ok(cached_response(read.map(|likes| LikeCountResponse { likes })))
}

// ============================================================================
// ROUTER
// ============================================================================

/// Album routes. Only the like toggle requires authentication.
pub fn create_router(state: AppState, auth: AuthMiddlewareState) -> Router {
    Router::new()
        .route("/", post(create_album).get(list_albums))
        .route("/:id", get(get_album).put(update_album).delete(delete_album))
        .route("/:id/covers", post(add_cover))
        .route(
            "/:id/likes",
            get(like_count)
                .merge(post(toggle_like).route_layer(from_fn_with_state(auth, auth_middleware))),
        )
        .with_state(state)
}
