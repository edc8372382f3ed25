//! Real-time delivery: per-conversation broadcast and SSE subscriptions

pub mod broadcast;
pub mod subscription;

pub use broadcast::{ChatBroadcast, ConversationKey};
pub use subscription::subscribe_conversation;
