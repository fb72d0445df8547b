//! API Request and Response Types
//!
//! Request bodies keep required fields as `Option` so a missing field is
//! reported as `MISSING_FIELD` instead of a generic deserialization error.

// Album types
mod album;
pub use album::*;

// Song types
mod song;
pub use song::*;

// Playlist and collaboration types
mod playlist;
pub use playlist::*;

// User types
mod user;
pub use user::*;

// Login and token types
mod authentication;
pub use authentication::*;

use crate::error::{ApiError, ApiResult};

/// Unwrap a required request field.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> ApiResult<T> {
    value.ok_or_else(|| ApiError::missing_field(field))
}

/// Unwrap a required, non-blank string field.
pub(crate) fn required_text(value: Option<String>, field: &str) -> ApiResult<String> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        Some(_) => Err(ApiError::invalid_input(format!("'{}' must not be empty", field))),
        None => Err(ApiError::missing_field(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_required_text() {
        assert_eq!(required_text(Some("Fix You".into()), "title").unwrap(), "Fix You");
        assert_eq!(
            required_text(Some("  ".into()), "title").unwrap_err().code,
            ErrorCode::InvalidInput
        );
        assert_eq!(
            required_text(None, "title").unwrap_err().code,
            ErrorCode::MissingField
        );
    }

    #[test]
    fn test_required() {
        assert_eq!(required(Some(2008), "year").unwrap(), 2008);
        assert!(required::<i32>(None, "year").is_err());
    }
}
