//! Realtime Message Reconciliation
//!
//! Maintains the locally ordered message sequence for the active
//! conversation, combining three inputs:
//!
//! 1. an initial bulk history load, ordered ascending by creation time,
//! 2. subscription events delivering messages produced by either party,
//! 3. local optimistic entries staged at send time.
//!
//! A staged send gets a temporary id and is appended immediately; the
//! durable write either confirms it (adopting the server-assigned record) or
//! rolls it back by the temporary id. Subscription events are filtered to
//! the active pair and deduplicated by id, so receiving the echo of one's
//! own send never produces a duplicate entry.
//!
//! Each history load starts a new epoch; a fetch result that arrives after
//! the conversation changed carries a stale token and is discarded without
//! mutating state.

use chrono::Utc;
use uuid::Uuid;

use crate::shared::error::SharedError;
use crate::shared::validate::validate_message_content;
use crate::shared::DirectMessage;

/// Delivery state of a timeline entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    /// Staged locally, durable write still in flight
    Pending,
    /// Confirmed durable (stored, or delivered by the subscription)
    Durable,
}

/// One message in the local sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub message: DirectMessage,
    pub delivery: DeliveryState,
}

/// Token tying a history fetch to the load that started it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadToken {
    epoch: u64,
}

/// Why a send could not be staged
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The subscription is not established; nothing may touch the durable
    /// store while disconnected
    #[error("not connected")]
    Disconnected,
    /// The content failed validation
    #[error(transparent)]
    InvalidContent(#[from] SharedError),
}

/// The locally ordered message sequence for one conversation
#[derive(Debug)]
pub struct ConversationTimeline {
    self_id: Uuid,
    peer_id: Uuid,
    entries: Vec<TimelineEntry>,
    epoch: u64,
    loaded: bool,
    connected: bool,
}

impl ConversationTimeline {
    /// Create the timeline for the conversation with `peer_id`
    ///
    /// Starts disconnected; sending is gated until the subscription
    /// reports established.
    pub fn new(self_id: Uuid, peer_id: Uuid) -> Self {
        Self {
            self_id,
            peer_id,
            entries: Vec::new(),
            epoch: 0,
            loaded: false,
            connected: false,
        }
    }

    pub fn peer_id(&self) -> Uuid {
        self.peer_id
    }

    /// Begin a (re)load of the history
    ///
    /// Clears the sequence and returns the token the eventual fetch result
    /// must present. Starting a new load invalidates all earlier tokens.
    pub fn begin_load(&mut self) -> LoadToken {
        self.epoch += 1;
        self.entries.clear();
        self.loaded = false;
        LoadToken { epoch: self.epoch }
    }

    /// Apply a fetched history
    ///
    /// Returns false (and changes nothing) when the token is stale, which
    /// happens when another load started while this fetch was in flight.
    pub fn apply_history(&mut self, token: LoadToken, history: Vec<DirectMessage>) -> bool {
        if token.epoch != self.epoch {
            tracing::debug!("Discarding stale history fetch (epoch {})", token.epoch);
            return false;
        }

        self.entries = history
            .into_iter()
            .filter(|m| m.is_between(self.self_id, self.peer_id))
            .map(|message| TimelineEntry {
                message,
                delivery: DeliveryState::Durable,
            })
            .collect();
        self.loaded = true;
        true
    }

    /// Whether the initial history load has completed
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Update the subscription state. Sending is permitted only while
    /// connected.
    pub fn set_connected(&mut self, connected: bool) {
        self.connected = connected;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Stage an optimistic send
    ///
    /// Validates the content, appends a pending entry under a temporary id,
    /// and returns the staged message for the durable write. While
    /// disconnected this fails without touching anything; the caller keeps
    /// the draft.
    pub fn stage_send(&mut self, content: &str) -> Result<DirectMessage, SendError> {
        if !self.connected {
            return Err(SendError::Disconnected);
        }
        validate_message_content(content)?;

        let staged = DirectMessage {
            id: Uuid::new_v4(),
            sender_id: self.self_id,
            receiver_id: self.peer_id,
            content: content.to_string(),
            created_at: Utc::now(),
        };

        self.entries.push(TimelineEntry {
            message: staged.clone(),
            delivery: DeliveryState::Pending,
        });

        Ok(staged)
    }

    /// Confirm a staged send with the durable record
    ///
    /// The pending entry keeps its position (send order) but adopts the
    /// server-assigned id and timestamp. If the subscription echo already
    /// arrived under the durable id, that echo is dropped in favor of the
    /// confirmed entry.
    pub fn confirm_send(&mut self, temp_id: Uuid, durable: DirectMessage) {
        // Drop an echo that raced ahead of the confirmation
        self.entries
            .retain(|e| !(e.message.id == durable.id && e.delivery == DeliveryState::Durable));

        match self.entries.iter_mut().find(|e| e.message.id == temp_id) {
            Some(entry) => {
                entry.message = durable;
                entry.delivery = DeliveryState::Durable;
            }
            None => {
                // The pending entry is gone (e.g. a reload raced the
                // confirmation); fall back to appending the durable record
                if !self.contains(durable.id) {
                    self.entries.push(TimelineEntry {
                        message: durable,
                        delivery: DeliveryState::Durable,
                    });
                }
            }
        }
    }

    /// Roll back a staged send whose durable write failed
    ///
    /// The compensating action: the entry is removed by its temporary id
    /// and no retry is attempted. Returns whether an entry was removed.
    pub fn roll_back(&mut self, temp_id: Uuid) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.message.id != temp_id);
        self.entries.len() < before
    }

    /// Apply a subscription event
    ///
    /// Events for other pairs are ignored even if delivered on a shared
    /// channel namespace, and already-present ids are ignored so the echo
    /// of a confirmed send does not duplicate. Returns whether the event
    /// was appended.
    pub fn apply_event(&mut self, message: DirectMessage) -> bool {
        if !message.is_between(self.self_id, self.peer_id) {
            return false;
        }
        if self.contains(message.id) {
            return false;
        }

        self.entries.push(TimelineEntry {
            message,
            delivery: DeliveryState::Durable,
        });
        true
    }

    fn contains(&self, id: Uuid) -> bool {
        self.entries.iter().any(|e| e.message.id == id)
    }

    /// The local sequence, in order
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// The messages of the local sequence, in order
    pub fn messages(&self) -> impl Iterator<Item = &DirectMessage> {
        self.entries.iter().map(|e| &e.message)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of staged sends awaiting confirmation
    pub fn pending_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.delivery == DeliveryState::Pending)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(sender: Uuid, receiver: Uuid, content: &str) -> DirectMessage {
        DirectMessage {
            id: Uuid::new_v4(),
            sender_id: sender,
            receiver_id: receiver,
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }

    fn connected_timeline() -> (ConversationTimeline, Uuid, Uuid) {
        let me = Uuid::new_v4();
        let peer = Uuid::new_v4();
        let mut timeline = ConversationTimeline::new(me, peer);
        timeline.set_connected(true);
        (timeline, me, peer)
    }

    #[test]
    fn test_history_load() {
        let (mut timeline, me, peer) = connected_timeline();
        let token = timeline.begin_load();

        let ok = timeline.apply_history(
            token,
            vec![message(peer, me, "hi"), message(me, peer, "hello")],
        );
        assert!(ok);
        assert!(timeline.is_loaded());
        assert_eq!(timeline.len(), 2);
    }

    #[test]
    fn test_stale_history_is_discarded() {
        let (mut timeline, me, peer) = connected_timeline();
        let stale = timeline.begin_load();
        let fresh = timeline.begin_load();

        assert!(!timeline.apply_history(stale, vec![message(peer, me, "old")]));
        assert_eq!(timeline.len(), 0);

        assert!(timeline.apply_history(fresh, vec![message(peer, me, "new")]));
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_send_while_disconnected_is_refused() {
        let me = Uuid::new_v4();
        let peer = Uuid::new_v4();
        let mut timeline = ConversationTimeline::new(me, peer);

        let result = timeline.stage_send("hello");
        assert_eq!(result.unwrap_err(), SendError::Disconnected);
        assert_eq!(timeline.len(), 0);
    }

    #[test]
    fn test_stage_confirm_flow() {
        let (mut timeline, me, peer) = connected_timeline();

        let staged = timeline.stage_send("hello").unwrap();
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.pending_count(), 1);

        let durable = message(me, peer, "hello");
        timeline.confirm_send(staged.id, durable.clone());

        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.pending_count(), 0);
        assert_eq!(timeline.entries()[0].message.id, durable.id);
    }

    #[test]
    fn test_rollback_restores_presend_length() {
        let (mut timeline, _me, _peer) = connected_timeline();

        let before = timeline.len();
        let staged = timeline.stage_send("doomed").unwrap();
        assert_eq!(timeline.len(), before + 1);

        assert!(timeline.roll_back(staged.id));
        assert_eq!(timeline.len(), before);
        assert!(!timeline.roll_back(staged.id));
    }

    #[test]
    fn test_event_filtering_by_pair() {
        let (mut timeline, me, _peer) = connected_timeline();
        let stranger = Uuid::new_v4();

        assert!(!timeline.apply_event(message(stranger, me, "spam")));
        assert_eq!(timeline.len(), 0);
    }

    #[test]
    fn test_event_dedup_by_id() {
        let (mut timeline, me, peer) = connected_timeline();
        let incoming = message(peer, me, "hi");

        assert!(timeline.apply_event(incoming.clone()));
        assert!(!timeline.apply_event(incoming));
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_own_echo_does_not_duplicate() {
        let (mut timeline, me, peer) = connected_timeline();

        let staged = timeline.stage_send("hello").unwrap();
        let durable = message(me, peer, "hello");

        timeline.confirm_send(staged.id, durable.clone());
        assert!(!timeline.apply_event(durable));
        assert_eq!(timeline.len(), 1);
    }

    #[test]
    fn test_echo_racing_ahead_of_confirmation() {
        let (mut timeline, me, peer) = connected_timeline();

        let staged = timeline.stage_send("hello").unwrap();
        let durable = message(me, peer, "hello");

        // The broadcast echo lands before the HTTP response
        assert!(timeline.apply_event(durable.clone()));
        timeline.confirm_send(staged.id, durable.clone());

        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.entries()[0].message.id, durable.id);
    }

    #[test]
    fn test_optimistic_entries_keep_send_order() {
        let (mut timeline, _me, _peer) = connected_timeline();

        let first = timeline.stage_send("first").unwrap();
        let second = timeline.stage_send("second").unwrap();

        let contents: Vec<_> = timeline.messages().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["first", "second"]);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_empty_content_is_refused() {
        let (mut timeline, _me, _peer) = connected_timeline();

        let result = timeline.stage_send("   ");
        assert!(matches!(result, Err(SendError::InvalidContent(_))));
        assert_eq!(timeline.len(), 0);
    }
}
