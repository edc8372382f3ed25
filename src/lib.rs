//! Confab - Main Library
//!
//! Confab is a social chat application: registration and login, friend
//! requests and friend lists, and realtime direct messaging.
//!
//! # Module Structure
//!
//! The library is organized into three main modules:
//!
//! - **`shared`** - Types shared between client and backend
//!   - Profile, friend request, and message DTOs
//!   - Field-scoped validation
//!   - Error types
//!
//! - **`backend`** - Axum HTTP server
//!   - Identity (bcrypt + JWT sessions) and profiles
//!   - Friend-request lifecycle backed by Postgres
//!   - Direct messages with per-conversation realtime fan-out (SSE)
//!   - Filesystem avatar store with signed retrieval URLs
//!
//! - **`client`** - Headless client-side state
//!   - Typed API client over the HTTP surface
//!   - Single-open-chat selection state
//!   - Optimistic message timeline reconciliation
//!
//! # Thread Safety
//!
//! Server state is shared through `Arc` and `tokio::sync::broadcast`
//! channels. Client state is owned by a single session and mutated only by
//! its owner; network results are applied explicitly.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
pub mod backend;

/// Headless client-side state and API client
pub mod client;
