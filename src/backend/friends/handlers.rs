//! Friend Lifecycle HTTP Handlers
//!
//! Send/cancel/accept/decline plus the incoming, outgoing, and friend-list
//! reads. Unauthorized mutations are silent no-ops (`applied`/`cancelled`
//! false) because the ownership checks live in the SQL predicates; the
//! handlers never reveal whether a request id exists for someone else.

use axum::{extract::State, response::Json};

use crate::backend::auth::users::is_unique_violation;
use crate::backend::error::ApiError;
use crate::backend::middleware::AuthUser;
use crate::backend::profile::db::get_profile;
use crate::backend::server::state::AppState;
use crate::shared::{
    CancelFriendRequestRequest, CancelFriendRequestResponse, FriendListResponse,
    ListIncomingResponse, ListOutgoingResponse, RespondFriendRequestRequest,
    RespondFriendRequestResponse, SendFriendRequestRequest, SendFriendRequestResponse,
};

use super::db;

/// Send a friend request (POST /api/friends/request)
///
/// Rejects self-requests, existing friendships, and pending requests in
/// either direction. The duplicate checks are advisory; the unique
/// constraint on (from_user, to_user) is the backstop under concurrency.
pub async fn send_friend_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<SendFriendRequestRequest>,
) -> Result<Json<SendFriendRequestResponse>, ApiError> {
    let pool = state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;
    let from_user = user.user_id;
    let to_user = request.to_user_id;

    if from_user == to_user {
        return Err(ApiError::Validation(crate::shared::SharedError::validation(
            "to_user_id",
            "Cannot send a friend request to yourself",
        )));
    }

    if get_profile(pool, to_user).await?.is_none() {
        return Ok(Json(SendFriendRequestResponse {
            success: false,
            request_id: None,
            error: Some("User not found".to_string()),
        }));
    }

    if db::are_friends(pool, from_user, to_user).await? {
        return Ok(Json(SendFriendRequestResponse {
            success: false,
            request_id: None,
            error: Some("Already friends".to_string()),
        }));
    }

    if db::pending_between(pool, from_user, to_user).await? {
        return Ok(Json(SendFriendRequestResponse {
            success: false,
            request_id: None,
            error: Some("Friend request already pending".to_string()),
        }));
    }

    let request_id = db::create_friend_request(pool, from_user, to_user)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                tracing::warn!("Duplicate friend request {} -> {}", from_user, to_user);
                ApiError::conflict("Friend request already exists")
            } else {
                ApiError::Database(e)
            }
        })?;

    tracing::info!("Friend request {} -> {} ({})", from_user, to_user, request_id);

    Ok(Json(SendFriendRequestResponse {
        success: true,
        request_id: Some(request_id),
        error: None,
    }))
}

/// Cancel a sent friend request (POST /api/friends/cancel)
pub async fn cancel_friend_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CancelFriendRequestRequest>,
) -> Result<Json<CancelFriendRequestResponse>, ApiError> {
    let pool = state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    let deleted = db::cancel_request(pool, request.request_id, user.user_id).await?;
    if deleted == 0 {
        tracing::debug!(
            "Cancel matched no row: request {} caller {}",
            request.request_id,
            user.user_id
        );
    }

    Ok(Json(CancelFriendRequestResponse {
        success: true,
        cancelled: deleted > 0,
    }))
}

/// React to a friend request (POST /api/friends/respond)
///
/// Accepting runs the status flip and the friendship insert as one atomic
/// unit. A request that was already reacted to (or never existed for this
/// caller) yields `applied: false`.
pub async fn respond_to_friend_request(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<RespondFriendRequestRequest>,
) -> Result<Json<RespondFriendRequestResponse>, ApiError> {
    let pool = state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    let applied = if request.accept {
        db::accept_request(pool, request.request_id, request.from_user, user.user_id).await?
    } else {
        db::decline_request(pool, request.request_id, request.from_user, user.user_id).await? > 0
    };

    if applied {
        tracing::info!(
            "Friend request {} {} by {}",
            request.request_id,
            if request.accept { "accepted" } else { "declined" },
            user.user_id
        );
    }

    Ok(Json(RespondFriendRequestResponse {
        success: true,
        applied,
        error: None,
    }))
}

/// Pending friend requests addressed to the caller (GET /api/friends/requests)
pub async fn get_incoming_requests(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ListIncomingResponse>, ApiError> {
    let pool = state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    let requests = db::incoming_requests(pool, user.user_id).await?;

    Ok(Json(ListIncomingResponse { requests }))
}

/// Friend requests the caller has sent (GET /api/friends/sent)
pub async fn get_outgoing_requests(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<ListOutgoingResponse>, ApiError> {
    let pool = state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    let requests = db::outgoing_requests(pool, user.user_id).await?;

    Ok(Json(ListOutgoingResponse { requests }))
}

/// The caller's friend list (GET /api/friends)
pub async fn get_friend_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<FriendListResponse>, ApiError> {
    let pool = state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    let friends = db::friends_of(pool, user.user_id).await?;

    Ok(Json(FriendListResponse { friends }))
}
