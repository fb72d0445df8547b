//! Song REST API Routes

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tembang_core::{Song, SongId, SongQuery};

use crate::{
    cached_db::CachedCatalog,
    error::{ApiError, ApiResult},
    state::AppState,
    types::{SongCreatedResponse, SongListParams, SongListResponse, SongRequest},
};

/// POST /songs - Create a song
#[utoipa::path(
    post,
    path = "/songs",
    tag = "Songs",
    request_body = SongRequest,
    responses(
        (status = 201, description = "Song created", body = SongCreatedResponse),
        (status = 400, description = "Invalid request", body = ApiError),
    ),
)]
pub async fn create_song(
    State(catalog): State<CachedCatalog>,
    Json(req): Json<SongRequest>,
) -> ApiResult<impl IntoResponse> {
    let song_id = catalog.song_add(req.into_new_input()?).await?;
    Ok((StatusCode::CREATED, Json(SongCreatedResponse { song_id })))
}

/// GET /songs - Search songs by title and performer
#[utoipa::path(
    get,
    path = "/songs",
    tag = "Songs",
    params(SongListParams),
    responses(
        (status = 200, description = "Matching songs", body = SongListResponse),
        (status = 404, description = "No song matched", body = ApiError),
    ),
)]
pub async fn list_songs(
    State(catalog): State<CachedCatalog>,
    Query(params): Query<SongListParams>,
) -> ApiResult<Json<SongListResponse>> {
    let songs = catalog.songs(&SongQuery::from(params)).await?;
    Ok(Json(SongListResponse { songs }))
}

/// GET /songs/{id} - Get a song
#[utoipa::path(
    get,
    path = "/songs/{id}",
    tag = "Songs",
    params(("id" = String, Path, description = "Song ID")),
    responses(
        (status = 200, description = "Song details", body = Song),
        (status = 404, description = "Song not found", body = ApiError),
    ),
)]
pub async fn get_song(
    State(catalog): State<CachedCatalog>,
    Path(id): Path<SongId>,
) -> ApiResult<Json<Song>> {
    Ok(Json(catalog.song(&id).await?))
}

/// PUT /songs/{id} - Replace a song
#[utoipa::path(
    put,
    path = "/songs/{id}",
    tag = "Songs",
    params(("id" = String, Path, description = "Song ID")),
    request_body = SongRequest,
    responses(
        (status = 204, description = "Song updated"),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Song not found", body = ApiError),
    ),
)]
pub async fn update_song(
    State(catalog): State<CachedCatalog>,
    Path(id): Path<SongId>,
    Json(req): Json<SongRequest>,
) -> ApiResult<StatusCode> {
    catalog.song_edit(&id, &req.into_input()?).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /songs/{id} - Delete a song
#[utoipa::path(
    delete,
    path = "/songs/{id}",
    tag = "Songs",
    params(("id" = String, Path, description = "Song ID")),
    responses(
        (status = 204, description = "Song deleted"),
        (status = 404, description = "Song not found", body = ApiError),
    ),
)]
pub async fn delete_song(
    State(catalog): State<CachedCatalog>,
    Path(id): Path<SongId>,
) -> ApiResult<StatusCode> {
    catalog.song_remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_song).get(list_songs))
        .route("/:id", get(get_song).put(update_song).delete(delete_song))
        .with_state(state)
}
