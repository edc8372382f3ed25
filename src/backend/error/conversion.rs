//! Error Conversion
//!
//! Converts [`ApiError`] values into HTTP responses so handlers can return
//! `Result<_, ApiError>` directly.
//!
//! # Response Format
//!
//! Error responses are JSON objects:
//! ```json
//! {
//!   "error": "Error message",
//!   "field": "username",
//!   "status": 400
//! }
//! ```
//!
//! `field` is present only for validation errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

use crate::backend::error::types::ApiError;
use crate::shared::SharedError;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!("request failed: {:?}", self);
        } else {
            tracing::warn!("request rejected: {}", self);
        }

        let field = match &self {
            ApiError::Validation(SharedError::ValidationError { field, .. }) => {
                Some(field.clone())
            }
            _ => None,
        };

        let body = serde_json::json!({
            "error": self.public_message(),
            "field": field,
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_response_status() {
        let response = ApiError::Authentication.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ApiError::not_found("profile").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
