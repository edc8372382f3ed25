//! Router Configuration
//!
//! Assembles the public and protected route tables into the final router.
//! The auth middleware is applied only to the protected subtree, so
//! registration, login, and signed-URL avatar retrieval stay reachable
//! without a session.

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::backend::middleware::auth_middleware;
use crate::backend::routes::api_routes::{protected_routes, public_routes};
use crate::backend::server::state::AppState;

/// Create the axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router<()> {
    let protected = protected_routes().route_layer(axum::middleware::from_fn_with_state(
        app_state.clone(),
        auth_middleware,
    ));

    Router::new()
        .merge(public_routes())
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .fallback(|| async { "404 Not Found" })
        .with_state(app_state)
}
