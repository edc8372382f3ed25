//! Messaging HTTP Handlers
//!
//! Durable message writes and history reads. The durable write happens
//! first; the realtime broadcast follows it, so subscribers only ever see
//! messages that exist in the store.

use axum::{
    extract::{Path, State},
    response::Json,
};
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::friends::db::are_friends;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::validate::validate_message_content;
use crate::shared::{MessageHistoryResponse, SendMessageRequest, SendMessageResponse};

use super::db;

/// Send a direct message (POST /api/messages)
///
/// # Errors
///
/// * `400 Bad Request` - Empty or oversized content
/// * `403 Forbidden` - The recipient is not a friend of the caller
/// * `503 Service Unavailable` - Database not configured
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let pool = state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    validate_message_content(&request.content)?;

    if !are_friends(pool, user.user_id, request.receiver_id).await? {
        return Err(ApiError::Forbidden);
    }

    let message =
        db::insert_message(pool, user.user_id, request.receiver_id, &request.content).await?;

    let subscribers = state.chat_broadcast.publish(message.clone());
    tracing::debug!(
        "Message {} stored, broadcast to {} subscribers",
        message.id,
        subscribers
    );

    Ok(Json(SendMessageResponse {
        success: true,
        message: Some(message),
        error: None,
    }))
}

/// Fetch the conversation history with a peer (GET /api/messages/{peer_id})
///
/// Returns both directions of the pair, ordered ascending by creation time.
/// The query is scoped to the caller's id, so no one can read a third
/// party's conversation.
pub async fn get_history(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(peer_id): Path<Uuid>,
) -> Result<Json<MessageHistoryResponse>, ApiError> {
    let pool = state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    let messages = db::history_between(pool, user.user_id, peer_id).await?;

    Ok(Json(MessageHistoryResponse { messages }))
}
