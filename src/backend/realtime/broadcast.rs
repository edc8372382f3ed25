//! Real-time Message Broadcasting
//!
//! Per-conversation broadcast channels for realtime message delivery. A
//! conversation is identified by the unordered pair of participant ids, so
//! both sides land on the same channel regardless of who opened it first.
//! Channels are created on demand and garbage-collected once subscriber-free.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::shared::DirectMessage;

/// Capacity of each per-conversation channel
const CHANNEL_CAPACITY: usize = 100;

/// Unordered pair of user ids identifying a direct conversation
///
/// Built from ids rather than usernames: ids are stable under renames,
/// which name-derived room keys are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    lo: Uuid,
    hi: Uuid,
}

impl ConversationKey {
    /// Create the key for the conversation between `a` and `b`
    pub fn new(a: Uuid, b: Uuid) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Whether the given user is one side of this conversation
    pub fn involves(&self, user: Uuid) -> bool {
        self.lo == user || self.hi == user
    }
}

/// Broadcast state for direct-message conversations
///
/// Each conversation gets its own channel to prevent cross-talk; the client
/// still filters delivered events by pair as a defensive measure.
#[derive(Clone)]
pub struct ChatBroadcast {
    channels: Arc<Mutex<HashMap<ConversationKey, broadcast::Sender<DirectMessage>>>>,
}

impl ChatBroadcast {
    pub fn new() -> Self {
        Self {
            channels: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Get or create the broadcast sender for a conversation
    pub fn sender_for(&self, key: ConversationKey) -> broadcast::Sender<DirectMessage> {
        let mut channels = self.channels.lock().unwrap();
        channels
            .entry(key)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    /// Subscribe to a conversation's channel
    pub fn subscribe(&self, key: ConversationKey) -> broadcast::Receiver<DirectMessage> {
        self.sender_for(key).subscribe()
    }

    /// Publish a message to all subscribers of its conversation
    ///
    /// Returns the number of subscribers that received it; zero subscribers
    /// is not an error.
    pub fn publish(&self, message: DirectMessage) -> usize {
        let key = ConversationKey::new(message.sender_id, message.receiver_id);
        let sender = {
            let channels = self.channels.lock().unwrap();
            channels.get(&key).cloned()
        };

        match sender {
            Some(tx) => match tx.send(message) {
                Ok(count) => {
                    tracing::debug!("Message broadcast to {} subscribers", count);
                    count
                }
                Err(_) => 0,
            },
            None => 0,
        }
    }

    /// Drop channels that have no subscribers left
    pub fn cleanup_inactive_channels(&self) {
        self.channels
            .lock()
            .unwrap()
            .retain(|_, sender| sender.receiver_count() > 0);
    }

    /// Subscriber count for a conversation
    pub fn subscriber_count(&self, key: ConversationKey) -> usize {
        self.channels
            .lock()
            .unwrap()
            .get(&key)
            .map(|sender| sender.receiver_count())
            .unwrap_or(0)
    }
}

impl Default for ChatBroadcast {
    fn default() -> Self {
        Self::new()
    }
}
