//! API Route Handlers
//!
//! Route tables for the HTTP surface, split into the public routes and the
//! routes that sit behind the authentication middleware.
//!
//! # Routes
//!
//! ## Public
//! - `POST /api/auth/register` - User registration
//! - `POST /api/auth/login` - User login
//! - `GET /storage/{*path}` - Avatar retrieval (signed-URL authenticated)
//!
//! ## Protected (JWT bearer token required)
//! - `GET /api/auth/me` - Current user's profile
//! - `PATCH /api/profile/username|email|password` - Profile mutations
//! - `POST /api/profile/avatar` - Avatar upload
//! - `GET /api/users/search` - Stranger search
//! - `GET /api/friends` - Friend list
//! - `POST /api/friends/request|cancel|respond` - Friend lifecycle
//! - `GET /api/friends/requests` - Incoming pending requests
//! - `GET /api/friends/sent` - Outgoing requests
//! - `POST /api/messages` - Send a direct message
//! - `GET /api/messages/{peer_id}` - Conversation history
//! - `GET /api/realtime/{peer_id}` - SSE conversation subscription

use axum::routing::{get, patch, post};
use axum::Router;

use crate::backend::auth::{get_me, login, register};
use crate::backend::friends::{
    cancel_friend_request, get_friend_list, get_incoming_requests, get_outgoing_requests,
    respond_to_friend_request, send_friend_request,
};
use crate::backend::messages::{get_history, send_message};
use crate::backend::profile::handlers::{
    change_email, change_password, change_username, search_users, upload_avatar,
};
use crate::backend::realtime::subscribe_conversation;
use crate::backend::server::state::AppState;
use crate::backend::storage::serve_avatar;

/// Routes that require no session
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/storage/{*path}", get(serve_avatar))
}

/// Routes protected by the authentication middleware
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(get_me))
        // Profile
        .route("/api/profile/username", patch(change_username))
        .route("/api/profile/email", patch(change_email))
        .route("/api/profile/password", patch(change_password))
        .route("/api/profile/avatar", post(upload_avatar))
        .route("/api/users/search", get(search_users))
        // Friend lifecycle
        .route("/api/friends", get(get_friend_list))
        .route("/api/friends/request", post(send_friend_request))
        .route("/api/friends/cancel", post(cancel_friend_request))
        .route("/api/friends/respond", post(respond_to_friend_request))
        .route("/api/friends/requests", get(get_incoming_requests))
        .route("/api/friends/sent", get(get_outgoing_requests))
        // Messaging
        .route("/api/messages", post(send_message))
        .route("/api/messages/{peer_id}", get(get_history))
        .route("/api/realtime/{peer_id}", get(subscribe_conversation))
}
