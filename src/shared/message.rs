//! Direct Message Data Structure
//!
//! Messages are addressed by the (sender, receiver) user pair rather than a
//! derived room name; the pair is stable under username changes. A message is
//! owned by its sender at creation and immutable afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A direct message between two users
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirectMessage {
    /// Unique message ID
    pub id: Uuid,
    /// User who sent the message
    pub sender_id: Uuid,
    /// User the message is addressed to
    pub receiver_id: Uuid,
    /// Message content
    pub content: String,
    /// When the message was created
    pub created_at: DateTime<Utc>,
}

impl DirectMessage {
    /// Whether this message belongs to the conversation between `a` and `b`.
    ///
    /// Events on a shared channel namespace that involve other pairs must be
    /// ignored, so this check runs on every delivered event.
    pub fn is_between(&self, a: Uuid, b: Uuid) -> bool {
        (self.sender_id == a && self.receiver_id == b)
            || (self.sender_id == b && self.receiver_id == a)
    }

    /// Get a preview of the message content (first `max_len` characters)
    pub fn preview(&self, max_len: usize) -> String {
        if self.content.chars().count() <= max_len {
            self.content.clone()
        } else {
            let mut preview: String = self.content.chars().take(max_len.saturating_sub(3)).collect();
            preview.push_str("...");
            preview
        }
    }
}

/// Request to send a direct message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub receiver_id: Uuid,
    pub content: String,
}

/// Response after sending a direct message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub success: bool,
    /// The durable message as stored, including server-assigned id and time
    pub message: Option<DirectMessage>,
    pub error: Option<String>,
}

/// Response for a conversation history fetch, ordered ascending by time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageHistoryResponse {
    pub messages: Vec<DirectMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(sender: Uuid, receiver: Uuid) -> DirectMessage {
        DirectMessage {
            id: Uuid::new_v4(),
            sender_id: sender,
            receiver_id: receiver,
            content: "hello".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_between_both_directions() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let c = Uuid::new_v4();
        assert!(message(a, b).is_between(a, b));
        assert!(message(b, a).is_between(a, b));
        assert!(!message(a, c).is_between(a, b));
        assert!(!message(c, b).is_between(a, b));
    }

    #[test]
    fn test_preview_truncates() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut msg = message(a, b);
        msg.content = "a long message that should be truncated".to_string();
        assert_eq!(msg.preview(10), "a long ...");
        msg.content = "short".to_string();
        assert_eq!(msg.preview(10), "short");
    }
}
