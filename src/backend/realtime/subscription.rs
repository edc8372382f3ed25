//! Real-time Subscription Handler
//!
//! Server-Sent Events stream for a single conversation
//! (GET /api/realtime/{peer_id}). SSE gives us one-way server-to-client
//! delivery over plain HTTP, which is all the message feed needs; axum's
//! keep-alive injects comment lines to hold the connection open.

use axum::{
    extract::{Path, State},
    response::sse::{Event, Sse},
};
use futures_util::stream;
use uuid::Uuid;

use crate::backend::error::ApiError;
use crate::backend::friends::db::are_friends;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::broadcast::ConversationKey;
use crate::backend::server::state::AppState;

/// Subscribe to the conversation with a peer
///
/// Events are named `message` and carry the stored [`DirectMessage`] as
/// JSON. Delivery order is channel order; no sequence numbers are exposed,
/// and events published while a receiver lags are skipped, not replayed.
///
/// # Errors
///
/// * `401 Unauthorized` - Missing or invalid token
/// * `403 Forbidden` - The peer is not a friend of the caller
/// * `503 Service Unavailable` - Database not configured
///
/// [`DirectMessage`]: crate::shared::DirectMessage
pub async fn subscribe_conversation(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(peer_id): Path<Uuid>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let pool = state.db_pool.as_ref().ok_or(ApiError::DatabaseUnavailable)?;

    if !are_friends(pool, user.user_id, peer_id).await? {
        return Err(ApiError::Forbidden);
    }

    let key = ConversationKey::new(user.user_id, peer_id);
    let rx = state.chat_broadcast.subscribe(key);
    let pair = (user.user_id, peer_id);

    tracing::info!(
        "Realtime subscription opened: {} <-> {}",
        user.user_id,
        peer_id
    );

    let stream = stream::unfold((rx, pair), move |(mut rx, pair)| async move {
        // Loop until an event for this pair arrives or the channel closes
        loop {
            match rx.recv().await {
                Ok(message) => {
                    // Channels are pair-scoped already; the filter guards
                    // against events from a shared or reused namespace
                    if !message.is_between(pair.0, pair.1) {
                        continue;
                    }

                    let data = match serde_json::to_string(&message) {
                        Ok(data) => data,
                        Err(e) => {
                            tracing::error!("Failed to serialize message event: {:?}", e);
                            continue;
                        }
                    };

                    let sse_event = Event::default().event("message").data(data);
                    return Some((Ok(sse_event), (rx, pair)));
                }
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("Realtime receiver lagged, skipped {} events", skipped);
                    continue;
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => {
                    tracing::debug!("Conversation channel closed, ending stream");
                    return None;
                }
            }
        }
    });

    Ok(Sse::new(stream).keep_alive(axum::response::sse::KeepAlive::default()))
}
