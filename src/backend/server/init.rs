//! Server Initialization
//!
//! Builds the application state and router.
//!
//! # Initialization Steps
//!
//! 1. Create the per-conversation broadcast state
//! 2. Load the optional database pool and run migrations
//! 3. Build the avatar store from the environment
//! 4. Create the router with all routes and middleware
//! 5. Start the periodic broadcast-channel cleanup task

use axum::Router;

use crate::backend::realtime::ChatBroadcast;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::load_database;
use crate::backend::server::state::AppState;
use crate::backend::storage::AvatarStore;

/// Interval between broadcast-channel cleanup sweeps
const CLEANUP_INTERVAL_SECS: u64 = 300;

/// Create and configure the axum application
///
/// Resilient by design: a missing database disables database-backed routes
/// (503) rather than aborting startup.
pub async fn create_app() -> Router<()> {
    tracing::info!("Initializing Confab backend server");

    let chat_broadcast = ChatBroadcast::new();
    let db_pool = load_database().await;
    let avatar_store = AvatarStore::from_env();

    let app_state = AppState {
        db_pool,
        chat_broadcast,
        avatar_store,
    };

    let app = create_router(app_state.clone());

    // Subscriber-free conversation channels accumulate as users come and
    // go; sweep them periodically
    let cleanup_state = app_state.chat_broadcast.clone();
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(CLEANUP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            cleanup_state.cleanup_inactive_channels();
            tracing::debug!("Cleaned up inactive conversation channels");
        }
    });

    tracing::info!("Router configured with periodic cleanup task");

    app
}
