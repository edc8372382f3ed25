//! Application State Management
//!
//! [`AppState`] is the central state container for the axum application. The
//! `FromRef` implementations let handlers extract just the part they need
//! instead of the whole state.
//!
//! # Thread Safety
//!
//! - `PgPool` is internally reference-counted and cloneable
//! - [`ChatBroadcast`] shares its channel map behind `Arc<Mutex<..>>`
//! - [`AvatarStore`] is a path plus signing config, cheap to clone

use axum::extract::FromRef;
use sqlx::PgPool;

use crate::backend::realtime::ChatBroadcast;
use crate::backend::storage::AvatarStore;

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    ///
    /// `None` when `DATABASE_URL` is not set; handlers answer 503 in that
    /// case instead of crashing at startup.
    pub db_pool: Option<PgPool>,

    /// Per-conversation broadcast channels for realtime delivery
    pub chat_broadcast: ChatBroadcast,

    /// Filesystem avatar store with signed retrieval URLs
    pub avatar_store: AvatarStore,
}

impl FromRef<AppState> for Option<PgPool> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.db_pool.clone()
    }
}

impl FromRef<AppState> for ChatBroadcast {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.chat_broadcast.clone()
    }
}

impl FromRef<AppState> for AvatarStore {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.avatar_store.clone()
    }
}
