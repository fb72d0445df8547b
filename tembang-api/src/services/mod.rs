//! Service Layer
//!
//! Business rules that sit between the routes and the store: playlist
//! access resolution, like toggling, authentication, and the playlist,
//! collaboration and user workflows.

mod access_service;
mod authentication_service;
mod collaboration_service;
mod like_service;
mod playlist_service;
mod user_service;

pub use access_service::*;
pub use authentication_service::*;
pub use collaboration_service::*;
pub use like_service::*;
pub use playlist_service::*;
pub use user_service::*;
