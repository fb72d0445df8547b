//! Collaboration REST API Routes

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use tembang_storage::CatalogStore;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthExtractor,
    services::{add_collaborator, remove_collaborator, PlaylistAccessResolver},
    state::AppState,
    types::{required, CollaborationCreatedResponse, CollaborationRequest},
};

/// POST /collaborations - Grant a user access to the caller's playlist
#[utoipa::path(
    post,
    path = "/collaborations",
    tag = "Collaborations",
    request_body = CollaborationRequest,
    responses(
        (status = 201, description = "Collaboration created", body = CollaborationCreatedResponse),
        (status = 400, description = "Already a collaborator", body = ApiError),
        (status = 403, description = "Caller is not the owner", body = ApiError),
        (status = 404, description = "Playlist or user not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_collaboration(
    State(store): State<Arc<dyn CatalogStore>>,
    State(access): State<PlaylistAccessResolver>,
    AuthExtractor(auth): AuthExtractor,
    Json(req): Json<CollaborationRequest>,
) -> ApiResult<impl IntoResponse> {
    let playlist_id = required(req.playlist_id, "playlistId")?;
    let user_id = required(req.user_id, "userId")?;
    let collaboration_id =
        add_collaborator(store.as_ref(), &access, &playlist_id, &auth.user_id, &user_id).await?;
    Ok((
        StatusCode::CREATED,
        Json(CollaborationCreatedResponse { collaboration_id }),
    ))
}

/// DELETE /collaborations - Revoke a collaborator
#[utoipa::path(
    delete,
    path = "/collaborations",
    tag = "Collaborations",
    request_body = CollaborationRequest,
    responses(
        (status = 204, description = "Collaboration removed"),
        (status = 400, description = "No such collaboration", body = ApiError),
        (status = 403, description = "Caller is not the owner", body = ApiError),
        (status = 404, description = "Playlist not found", body = ApiError),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_collaboration(
    State(store): State<Arc<dyn CatalogStore>>,
    State(access): State<PlaylistAccessResolver>,
    AuthExtractor(auth): AuthExtractor,
    Json(req): Json<CollaborationRequest>,
) -> ApiResult<StatusCode> {
    let playlist_id = required(req.playlist_id, "playlistId")?;
    let user_id = required(req.user_id, "userId")?;
    remove_collaborator(store.as_ref(), &access, &playlist_id, &auth.user_id, &user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", post(create_collaboration).delete(delete_collaboration))
        .with_state(state)
}
