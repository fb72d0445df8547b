//! User-related API types

use serde::{Deserialize, Serialize};
use tembang_core::UserId;

/// Request to register a user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub fullname: Option<String>,
}

/// Response to a successful user registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserCreatedResponse {
    #[schema(value_type = String)]
    pub user_id: UserId,
}
