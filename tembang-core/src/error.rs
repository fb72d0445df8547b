//! Error types for Tembang operations

use crate::EntityType;
use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Constraint violation on {constraint}: {reason}")]
    Constraint { constraint: String, reason: String },

    #[error("Referenced {entity_type} does not exist: {reason}")]
    ForeignKey {
        entity_type: EntityType,
        reason: String,
    },

    #[error("Query failed: {reason}")]
    QueryFailed { reason: String },

    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Storage unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Storage lock poisoned")]
    LockPoisoned,
}

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Master error type for catalog operations.
///
/// `NotFound`, `Invariant`, `Authorization` and `Authentication` are the
/// domain outcomes callers branch on. `Storage` carries infrastructure
/// failures that are neither.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TembangError {
    #[error("{entity_type} not found: {message}")]
    NotFound {
        entity_type: EntityType,
        message: String,
    },

    #[error("Invariant violated: {reason}")]
    Invariant { reason: String },

    #[error("Not authorized: {reason}")]
    Authorization { reason: String },

    #[error("Authentication failed: {reason}")]
    Authentication { reason: String },

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl TembangError {
    pub fn not_found(entity_type: EntityType, message: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            message: message.into(),
        }
    }

    pub fn invariant(reason: impl Into<String>) -> Self {
        Self::Invariant {
            reason: reason.into(),
        }
    }

    pub fn authorization(reason: impl Into<String>) -> Self {
        Self::Authorization {
            reason: reason.into(),
        }
    }

    pub fn authentication(reason: impl Into<String>) -> Self {
        Self::Authentication {
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::Authorization { .. })
    }

    pub fn is_invariant(&self) -> bool {
        matches!(self, Self::Invariant { .. })
    }
}

/// Constraint violations are write failures the caller can act on, so they
/// surface as `Invariant`; everything else stays an infrastructure error.
impl From<StorageError> for TembangError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Constraint { .. } | StorageError::ForeignKey { .. } => {
                TembangError::Invariant {
                    reason: err.to_string(),
                }
            }
            other => TembangError::Storage(other),
        }
    }
}

/// Result type for catalog operations.
pub type TembangResult<T> = Result<T, TembangError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = TembangError::not_found(EntityType::Playlist, "Playlist not found");
        assert_eq!(err.to_string(), "playlist not found: Playlist not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_constraint_violation_becomes_invariant() {
        let err: TembangError = StorageError::Constraint {
            constraint: "likes_user_album_key".into(),
            reason: "duplicate key".into(),
        }
        .into();
        assert!(err.is_invariant());
        assert!(err.to_string().contains("likes_user_album_key"));
    }

    #[test]
    fn test_infrastructure_errors_stay_storage() {
        let err: TembangError = StorageError::PoolExhausted.into();
        assert_eq!(err, TembangError::Storage(StorageError::PoolExhausted));
    }

    #[test]
    fn test_config_error_from() {
        let err: TembangError = ConfigError::MissingRequired {
            field: "jwt_secret".into(),
        }
        .into();
        assert!(matches!(err, TembangError::Config(_)));
    }
}
