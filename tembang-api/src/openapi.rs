//! OpenAPI Specification for the Tembang API
//!
//! Generated with utoipa from the route annotations and the request and
//! response types.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::{ApiError, ErrorCode};
use crate::routes::{album, authentication, collaboration, health, playlist, song, user};
use crate::types::*;

use tembang_core::{
    ActivityAction, ActivityView, Album, AlbumId, CollaborationId, HealthCheck, HealthStatus,
    LikeState, PlaylistId, PlaylistSummary, Song, SongId, SongSummary, User, UserId,
};

/// OpenAPI document for the Tembang API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tembang API",
        version = "0.1.0",
        description = "Music catalog and collaborative playlist service",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:5000", description = "Local Development")
    ),
    tags(
        (name = "Albums", description = "Albums, covers and likes"),
        (name = "Songs", description = "Song catalog"),
        (name = "Users", description = "User registration and profiles"),
        (name = "Authentications", description = "Login, token refresh and logout"),
        (name = "Playlists", description = "Playlists, playlist songs and activity logs"),
        (name = "Collaborations", description = "Playlist collaborator grants"),
        (name = "Health", description = "Liveness and readiness checks")
    ),
    paths(
        album::create_album,
        album::list_albums,
        album::get_album,
        album::update_album,
        album::delete_album,
        album::add_cover,
        album::toggle_like,
        album::like_count,
        song::create_song,
        song::list_songs,
        song::get_song,
        song::update_song,
        song::delete_song,
        user::create_user,
        user::get_user_by_id,
        authentication::login,
        authentication::refresh,
        authentication::logout,
        playlist::create_playlist,
        playlist::list_playlists,
        playlist::delete_playlist,
        playlist::add_playlist_song,
        playlist::get_playlist_songs,
        playlist::remove_playlist_song,
        playlist::get_activities,
        collaboration::create_collaboration,
        collaboration::delete_collaboration,
        health::ping,
        health::liveness,
        health::readiness,
    ),
    components(
        schemas(
            // Errors
            ApiError,
            ErrorCode,
            // Identifiers
            AlbumId,
            SongId,
            UserId,
            PlaylistId,
            CollaborationId,
            // Domain types
            Album,
            Song,
            SongSummary,
            User,
            PlaylistSummary,
            ActivityView,
            ActivityAction,
            LikeState,
            HealthCheck,
            HealthStatus,
            // Request/response types
            AlbumRequest,
            AlbumCreatedResponse,
            AlbumListResponse,
            AlbumDetail,
            CoverRequest,
            LikeToggleResponse,
            LikeCountResponse,
            SongRequest,
            SongCreatedResponse,
            SongListResponse,
            CreateUserRequest,
            UserCreatedResponse,
            LoginRequest,
            RefreshTokenRequest,
            TokenPairResponse,
            AccessTokenResponse,
            CreatePlaylistRequest,
            PlaylistCreatedResponse,
            PlaylistListResponse,
            PlaylistSongRequest,
            PlaylistDetail,
            ActivitiesResponse,
            CollaborationRequest,
            CollaborationCreatedResponse,
            health::HealthResponse,
            health::HealthDetails,
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the bearer JWT scheme referenced by protected routes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token; `sub` is the user id"))
                        .build(),
                ),
            );
        }
    }
}

impl ApiDoc {
    /// Generate OpenAPI spec as JSON string.
    pub fn to_json() -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::openapi())
    }
}
