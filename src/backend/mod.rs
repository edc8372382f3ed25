//! Confab backend server
//!
//! An axum HTTP service providing the four capability groups the client
//! relies on: identity (bcrypt + JWT), relational storage (Postgres via
//! sqlx), object storage (filesystem avatar store with signed URLs), and
//! realtime pub/sub (per-conversation broadcast channels over SSE).

pub mod auth;
pub mod error;
pub mod friends;
pub mod messages;
pub mod middleware;
pub mod profile;
pub mod realtime;
pub mod routes;
pub mod server;
pub mod storage;
