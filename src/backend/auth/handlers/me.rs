//! Current-User Handler
//!
//! Implements GET /api/auth/me: returns the profile of the token's user.

use axum::{extract::State, response::Json};
use sqlx::PgPool;

use crate::backend::error::ApiError;
use crate::backend::middleware::AuthUser;
use crate::backend::profile::db::get_profile;
use crate::shared::Profile;

/// Get the authenticated user's profile
///
/// # Errors
///
/// * `401 Unauthorized` - Missing or invalid token
/// * `404 Not Found` - The profile row is gone
/// * `503 Service Unavailable` - Database not configured
pub async fn get_me(
    State(pool): State<Option<PgPool>>,
    AuthUser(user): AuthUser,
) -> Result<Json<Profile>, ApiError> {
    let pool = pool.ok_or(ApiError::DatabaseUnavailable)?;

    let profile = get_profile(&pool, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("profile"))?;

    Ok(Json(profile))
}
