//! Registration Handler
//!
//! Implements POST /api/auth/register.
//!
//! # Registration Process
//!
//! 1. Validate username, email format, password strength, and confirmation
//! 2. Check for an existing account with the same email or username
//! 3. Hash the password using bcrypt
//! 4. Create the user and profile rows in one transaction
//! 5. Generate a JWT token and return it with the profile
//!
//! Creating the identity and the profile atomically means a failure in either
//! insert rolls back both; there is no sign-up-succeeded-but-profile-missing
//! state to report.

use axum::{extract::State, response::Json};
use bcrypt::{hash, DEFAULT_COST};
use sqlx::PgPool;

use crate::backend::auth::sessions::create_token;
use crate::backend::auth::users::{create_user_with_profile, get_user_by_email, is_unique_violation};
use crate::backend::error::ApiError;
use crate::backend::profile::db::get_profile_by_username;
use crate::shared::profile::{AuthResponse, RegisterRequest};
use crate::shared::validate::{
    validate_email, validate_password, validate_password_confirmation, validate_username,
};

/// Register handler
///
/// # Errors
///
/// * `400 Bad Request` - Validation failed (field-scoped message)
/// * `409 Conflict` - Email or username already registered
/// * `503 Service Unavailable` - Database not configured
/// * `500 Internal Server Error` - Hashing, insert, or token generation failed
pub async fn register(
    State(pool): State<Option<PgPool>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let username = request.username.trim().to_string();
    let email = request.email.trim().to_lowercase();

    tracing::info!("Registration request for username: {}", username);

    validate_username(&username)?;
    validate_email(&email)?;
    validate_password(&request.password)?;
    validate_password_confirmation(&request.password, &request.confirm_password)?;

    if get_user_by_email(&pool, &email).await?.is_some() {
        tracing::warn!("Email already registered: {}", email);
        return Err(ApiError::conflict("Email already registered"));
    }

    if get_profile_by_username(&pool, &username).await?.is_some() {
        tracing::warn!("Username already taken: {}", username);
        return Err(ApiError::conflict("Username already taken"));
    }

    let password_hash = hash(&request.password, DEFAULT_COST)?;

    let profile = create_user_with_profile(&pool, &username, &email, &password_hash)
        .await
        .map_err(|e| {
            // Concurrent registration can still trip the unique constraints
            if is_unique_violation(&e) {
                ApiError::conflict("Email or username already registered")
            } else {
                ApiError::Database(e)
            }
        })?;

    let token = create_token(profile.id, profile.email.clone())?;

    tracing::info!("User registered: {} ({})", profile.username, profile.email);

    Ok(Json(AuthResponse { token, profile }))
}
