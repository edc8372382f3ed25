//! Login Handler
//!
//! Implements POST /api/auth/login.
//!
//! # Security
//!
//! - Passwords are verified using bcrypt
//! - Unknown email and wrong password return the same 401 so callers cannot
//!   enumerate accounts
//! - Passwords are never logged or returned

use axum::{extract::State, response::Json};
use bcrypt::verify;
use sqlx::PgPool;

use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::get_user_by_email;
use crate::backend::error::ApiError;
use crate::backend::profile::db::get_profile;
use crate::shared::profile::{AuthResponse, LoginRequest};

/// Login handler
///
/// # Errors
///
/// * `401 Unauthorized` - Unknown email or incorrect password
/// * `503 Service Unavailable` - Database not configured
/// * `500 Internal Server Error` - Query or token generation failed
pub async fn login(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let email = request.email.trim().to_lowercase();
    tracing::info!("Login request for: {}", email);

    let user = get_user_by_email(&pool, &email).await?.ok_or_else(|| {
        tracing::warn!("Login for unknown email: {}", email);
        ApiError::Authentication
    })?;

    let valid = verify(&request.password, &user.password_hash)?;
    if !valid {
        tracing::warn!("Invalid password for: {}", email);
        return Err(ApiError::Authentication);
    }

    let profile = get_profile(&pool, user.id)
        .await?
        .ok_or_else(|| ApiError::not_found("profile"))?;

    let token = create_token(user.id, user.email.clone())?;

    tracing::info!("User logged in: {} ({})", profile.username, profile.email);

    Ok(Json(AuthResponse { token, profile }))
}
