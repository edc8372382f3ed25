//! Backend Error Types
//!
//! The error taxonomy of the HTTP surface. Authorization failures on
//! mutations are deliberately absent: those are enforced as SQL predicates
//! and reported as a zero-row no-op in the response body instead of an error
//! status, so an unauthorized caller learns nothing about the row.

use axum::http::StatusCode;
use thiserror::Error;

use crate::shared::SharedError;

/// Errors surfaced by backend handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// No active session, or the presented token is invalid
    #[error("Authentication required")]
    Authentication,

    /// A read targeted data the caller may not see
    #[error("Forbidden")]
    Forbidden,

    /// The addressed entity does not exist
    #[error("Not found: {entity}")]
    NotFound {
        /// What was being looked up
        entity: String,
    },

    /// A uniqueness conflict (duplicate email, username, or pending request)
    #[error("Conflict: {message}")]
    Conflict {
        /// Human-readable error message
        message: String,
    },

    /// Field-scoped validation failure
    #[error(transparent)]
    Validation(#[from] SharedError),

    /// The database is not configured or the query failed
    #[error("Database error")]
    Database(#[from] sqlx::Error),

    /// The database is not configured on this deployment
    #[error("Database not configured")]
    DatabaseUnavailable,

    /// Object-storage failure (avatar store)
    #[error("Storage error: {message}")]
    Storage {
        /// Human-readable error message
        message: String,
    },

    /// A multi-step operation committed its first step and failed the second
    #[error("Partial failure: {completed} succeeded but {failed} failed")]
    PartialFailure {
        /// The step that durably completed
        completed: String,
        /// The step that failed afterwards
        failed: String,
    },

    /// Token generation or verification failed on the server side
    #[error("Token error")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Password hashing failed
    #[error("Password hashing error")]
    Hashing(#[from] bcrypt::BcryptError),
}

impl ApiError {
    /// Create a not-found error for the named entity
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
        }
    }

    /// Create a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// HTTP status code this error maps to
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Authentication => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Validation(err) => match err {
                SharedError::SerializationError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::Database(_) | Self::Token(_) | Self::Hashing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::DatabaseUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::PartialFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message exposed to clients.
    ///
    /// Provider failures are collapsed to an opaque message; the detailed
    /// error is logged server-side only.
    pub fn public_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Token(_) | Self::Hashing(_) => "Server error".to_string(),
            Self::Storage { .. } => "Storage error".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::Authentication.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::not_found("user").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::conflict("duplicate").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Validation(SharedError::validation("email", "bad")).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::DatabaseUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_provider_errors_are_opaque() {
        let err = ApiError::Database(sqlx::Error::RowNotFound);
        assert_eq!(err.public_message(), "Server error");

        let err = ApiError::storage("disk full at /var/avatars");
        assert_eq!(err.public_message(), "Storage error");
    }

    #[test]
    fn test_validation_message_is_field_scoped() {
        let err = ApiError::Validation(SharedError::validation("username", "too short"));
        assert!(err.public_message().contains("username"));
    }
}
