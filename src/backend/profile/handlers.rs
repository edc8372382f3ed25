//! Profile HTTP Handlers
//!
//! Mutations on the caller's own profile plus the stranger search. Every
//! route here sits behind the auth middleware; the target row is always the
//! authenticated user's, never one named by the request.

use axum::{
    extract::{Query, State},
    response::Json,
};
use bcrypt::{hash, verify, DEFAULT_COST};
use bytes::Bytes;
use serde::Deserialize;

use crate::backend::auth::users::{
    get_user_by_id, is_unique_violation, update_email, update_password_hash,
};
use crate::backend::error::ApiError;
use crate::backend::middleware::AuthUser;
use crate::backend::profile::db;
use crate::backend::server::state::AppState;
use crate::backend::storage::{AvatarStore, SIGNED_URL_TTL_SECS};
use crate::shared::profile::{
    AvatarUploadResponse, ProfileUpdateResponse, SearchUsersResponse, UpdateEmailRequest,
    UpdatePasswordRequest, UpdateUsernameRequest,
};
use crate::shared::validate::{
    validate_email, validate_password, validate_password_confirmation, validate_username,
};

/// Change the caller's display username (PATCH /api/profile/username)
pub async fn change_username(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateUsernameRequest>,
) -> Result<Json<ProfileUpdateResponse>, ApiError> {
    let pool = state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    let username = request.username.trim().to_string();
    validate_username(&username)?;

    if let Some(existing) = db::get_profile_by_username(pool, &username).await? {
        if existing.id != user.user_id {
            return Err(ApiError::conflict("Username already taken"));
        }
    }

    db::update_username(pool, user.user_id, &username)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::conflict("Username already taken")
            } else {
                ApiError::Database(e)
            }
        })?;

    tracing::info!("Username changed for {}: {}", user.user_id, username);

    Ok(Json(ProfileUpdateResponse {
        success: true,
        error: None,
    }))
}

/// Change the caller's email (PATCH /api/profile/email)
pub async fn change_email(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdateEmailRequest>,
) -> Result<Json<ProfileUpdateResponse>, ApiError> {
    let pool = state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    let email = request.email.trim().to_lowercase();
    validate_email(&email)?;

    update_email(pool, user.user_id, &email).await.map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::conflict("Email already registered")
        } else {
            ApiError::Database(e)
        }
    })?;

    tracing::info!("Email changed for {}", user.user_id);

    Ok(Json(ProfileUpdateResponse {
        success: true,
        error: None,
    }))
}

/// Change the caller's password (PATCH /api/profile/password)
///
/// The current password re-authenticates the caller before anything is
/// written; an incorrect current password is a field-scoped validation
/// error, not an authentication failure.
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<UpdatePasswordRequest>,
) -> Result<Json<ProfileUpdateResponse>, ApiError> {
    let pool = state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    validate_password(&request.new_password)?;
    validate_password_confirmation(&request.new_password, &request.confirm_password)?;

    let record = get_user_by_id(pool, user.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("user"))?;

    let current_ok = verify(&request.current_password, &record.password_hash)?;
    if !current_ok {
        return Err(ApiError::Validation(crate::shared::SharedError::validation(
            "current_password",
            "Current password is incorrect",
        )));
    }

    let password_hash = hash(&request.new_password, DEFAULT_COST)?;
    update_password_hash(pool, user.user_id, &password_hash).await?;

    tracing::info!("Password changed for {}", user.user_id);

    Ok(Json(ProfileUpdateResponse {
        success: true,
        error: None,
    }))
}

/// Query parameters for an avatar upload
#[derive(Debug, Deserialize)]
pub struct AvatarParams {
    /// File extension of the uploaded image
    pub ext: String,
}

/// Upload a new avatar (POST /api/profile/avatar)
///
/// The raw image bytes are the request body. The file write and the profile
/// update cannot share a transaction; a failure after the write surfaces as
/// a partial failure rather than pretending nothing happened.
pub async fn upload_avatar(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<AvatarParams>,
    body: Bytes,
) -> Result<Json<AvatarUploadResponse>, ApiError> {
    let pool = state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;
    let store: &AvatarStore = &state.avatar_store;

    if body.is_empty() {
        return Err(ApiError::Validation(crate::shared::SharedError::validation(
            "avatar",
            "Uploaded image is empty",
        )));
    }

    let path = store.put(user.user_id, &params.ext, &body).await?;
    let url = store.signed_url(&path, SIGNED_URL_TTL_SECS)?;

    db::update_avatar_url(pool, user.user_id, &url)
        .await
        .map_err(|e| {
            tracing::error!("Avatar stored but profile update failed: {:?}", e);
            ApiError::PartialFailure {
                completed: "avatar upload".to_string(),
                failed: "profile update".to_string(),
            }
        })?;

    Ok(Json(AvatarUploadResponse {
        success: true,
        avatar_url: Some(url),
        error: None,
    }))
}

/// Query parameters for the user search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Username substring to match, case-insensitively
    pub q: String,
    /// Maximum number of results (default 4)
    pub limit: Option<u32>,
}

/// Search users with no existing relation to the caller
/// (GET /api/users/search)
pub async fn search_users(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchUsersResponse>, ApiError> {
    let pool = state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    if params.q.trim().is_empty() {
        return Ok(Json(SearchUsersResponse { users: Vec::new() }));
    }

    let limit = params.limit.unwrap_or(4).min(50) as i64;
    let users = db::search_strangers(pool, user.user_id, &params.q, limit).await?;

    Ok(Json(SearchUsersResponse { users }))
}
