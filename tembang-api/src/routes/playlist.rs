//! Playlist REST API Routes
//!
//! Every route requires authentication. Operations on an existing playlist
//! run the access check before touching anything else.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use tembang_core::PlaylistId;
use tembang_storage::CatalogStore;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthExtractor,
    services::{self, PlaylistAccessResolver},
    state::AppState,
    types::{
        required, required_text, ActivitiesResponse, CreatePlaylistRequest,
        PlaylistCreatedResponse, PlaylistDetail, PlaylistListResponse, PlaylistSongRequest,
    },
};

/// POST /playlists - Create a playlist owned by the caller
#[utoipa::path(
    post,
    path = "/playlists",
    tag = "Playlists",
    request_body = CreatePlaylistRequest,
    responses(
        (status = 201, description = "Playlist created", body = PlaylistCreatedResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_playlist(
    State(store): State<Arc<dyn CatalogStore>>,
    AuthExtractor(auth): AuthExtractor,
    Json(req): Json<CreatePlaylistRequest>,
) -> ApiResult<impl IntoResponse> {
    let name = required_text(req.name, "name")?;
    let playlist_id = services::create_playlist(store.as_ref(), name, &auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(PlaylistCreatedResponse { playlist_id })))
}

/// GET /playlists - Playlists the caller owns or collaborates on
#[utoipa::path(
    get,
    path = "/playlists",
    tag = "Playlists",
    responses(
        (status = 200, description = "Visible playlists", body = PlaylistListResponse),
        (status = 401, description = "Unauthorized", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_playlists(
    State(store): State<Arc<dyn CatalogStore>>,
    AuthExtractor(auth): AuthExtractor,
) -> ApiResult<Json<PlaylistListResponse>> {
    let playlists = services::list_playlists(store.as_ref(), &auth.user_id).await?;
    Ok(Json(PlaylistListResponse { playlists }))
}

/// DELETE /playlists/{id} - Delete a playlist
#[utoipa::path(
    delete,
    path = "/playlists/{id}",
    tag = "Playlists",
    params(("id" = String, Path, description = "Playlist ID")),
    responses(
        (status = 204, description = "Playlist deleted"),
        (status = 403, description = "Caller is not the owner", body = ApiError),
        (status = 404, description = "Playlist not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_playlist(
    State(store): State<Arc<dyn CatalogStore>>,
    State(access): State<PlaylistAccessResolver>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<PlaylistId>,
) -> ApiResult<StatusCode> {
    services::delete_playlist(store.as_ref(), &access, &id, &auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /playlists/{id}/songs - Add a song to a playlist
#[utoipa::path(
    post,
    path = "/playlists/{id}/songs",
    tag = "Playlists",
    params(("id" = String, Path, description = "Playlist ID")),
    request_body = PlaylistSongRequest,
    responses(
        (status = 201, description = "Song added"),
        (status = 403, description = "No access to the playlist", body = ApiError),
        (status = 404, description = "Playlist or song not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_playlist_song(
    State(store): State<Arc<dyn CatalogStore>>,
    State(access): State<PlaylistAccessResolver>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<PlaylistId>,
    Json(req): Json<PlaylistSongRequest>,
) -> ApiResult<StatusCode> {
    let song_id = required(req.song_id, "songId")?;
    services::add_song(store.as_ref(), &access, &id, &song_id, &auth.user_id).await?;
    Ok(StatusCode::CREATED)
}

/// GET /playlists/{id}/songs - Playlist with its songs
#[utoipa::path(
    get,
    path = "/playlists/{id}/songs",
    tag = "Playlists",
    params(("id" = String, Path, description = "Playlist ID")),
    responses(
        (status = 200, description = "Playlist with songs", body = PlaylistDetail),
        (status = 403, description = "No access to the playlist", body = ApiError),
        (status = 404, description = "Playlist not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_playlist_songs(
    State(store): State<Arc<dyn CatalogStore>>,
    State(access): State<PlaylistAccessResolver>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<PlaylistId>,
) -> ApiResult<Json<PlaylistDetail>> {
    let detail = services::playlist_with_songs(store.as_ref(), &access, &id, &auth.user_id).await?;
    Ok(Json(detail))
}

/// DELETE /playlists/{id}/songs - Remove a song from a playlist
#[utoipa::path(
    delete,
    path = "/playlists/{id}/songs",
    tag = "Playlists",
    params(("id" = String, Path, description = "Playlist ID")),
    request_body = PlaylistSongRequest,
    responses(
        (status = 204, description = "Song removed"),
        (status = 400, description = "Song is not in the playlist", body = ApiError),
        (status = 403, description = "No access to the playlist", body = ApiError),
        (status = 404, description = "Playlist not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn remove_playlist_song(
    State(store): State<Arc<dyn CatalogStore>>,
    State(access): State<PlaylistAccessResolver>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<PlaylistId>,
    Json(req): Json<PlaylistSongRequest>,
) -> ApiResult<StatusCode> {
    let song_id = required(req.song_id, "songId")?;
    services::remove_song(store.as_ref(), &access, &id, &song_id, &auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /playlists/{id}/activities - Activity log of a playlist
#[utoipa::path(
    get,
    path = "/playlists/{id}/activities",
    tag = "Playlists",
    params(("id" = String, Path, description = "Playlist ID")),
    responses(
        (status = 200, description = "Activity log, oldest first", body = ActivitiesResponse),
        (status = 403, description = "No access to the playlist", body = ApiError),
        (status = 404, description = "Playlist not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_activities(
    State(store): State<Arc<dyn CatalogStore>>,
    State(access): State<PlaylistAccessResolver>,
    AuthExtractor(auth): AuthExtractor,
    Path(id): Path<PlaylistId>,
) -> ApiResult<Json<ActivitiesResponse>> {
    let activities = services::activities(store.as_ref(), &access, &id, &auth.user_id).await?;
    Ok(Json(ActivitiesResponse {
        playlist_id: id,
        activities,
    }))
}

/// Playlist routes. The caller wraps them in the auth middleware.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_playlist).get(list_playlists))
        .route("/:id", delete(delete_playlist))
        .route(
            "/:id/songs",
            post(add_playlist_song)
                .get(get_playlist_songs)
                .delete(remove_playlist_song),
        )
        .route("/:id/activities", get(get_activities))
        .with_state(state)
}
