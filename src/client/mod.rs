//! Headless client-side state for Confab
//!
//! This module carries the state management the UI layer builds on, without
//! any rendering: the typed API client, the exclusive chat-selection state
//! machine, and the optimistic message timeline. Network results are applied
//! to the state explicitly, so every transition is testable without a server.

pub mod api;
pub mod config;
pub mod session;
pub mod state;
pub mod timeline;

pub use api::{ApiClient, ClientError};
pub use config::ClientConfig;
pub use session::{ChatSelection, ChatSession};
pub use state::ClientState;
pub use timeline::{ConversationTimeline, DeliveryState, LoadToken, SendError, TimelineEntry};
