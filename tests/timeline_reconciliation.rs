//! Timeline reconciliation tests
//!
//! The optimistic-send contract: staged entries appear immediately in send
//! order, a failed durable write removes exactly the staged entry, a
//! disconnected timeline refuses to stage at all, and subscription echoes
//! never duplicate confirmed sends.

use chrono::Utc;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use uuid::Uuid;

use confab::client::{ConversationTimeline, SendError};
use confab::shared::DirectMessage;

fn message(sender: Uuid, receiver: Uuid, content: &str) -> DirectMessage {
    DirectMessage {
        id: Uuid::new_v4(),
        sender_id: sender,
        receiver_id: receiver,
        content: content.to_string(),
        created_at: Utc::now(),
    }
}

#[test]
fn disconnected_send_never_stages_anything() {
    let me = Uuid::new_v4();
    let peer = Uuid::new_v4();
    let mut timeline = ConversationTimeline::new(me, peer);

    // Never connected: repeated attempts must leave the sequence untouched
    for _ in 0..3 {
        assert_eq!(timeline.stage_send("hello").unwrap_err(), SendError::Disconnected);
    }
    assert_eq!(timeline.len(), 0);
    assert_eq!(timeline.pending_count(), 0);
}

#[test]
fn failed_send_restores_presend_sequence() {
    let me = Uuid::new_v4();
    let peer = Uuid::new_v4();
    let mut timeline = ConversationTimeline::new(me, peer);
    let token = timeline.begin_load();
    timeline.apply_history(token, vec![message(peer, me, "earlier")]);
    timeline.set_connected(true);

    let before: Vec<Uuid> = timeline.messages().map(|m| m.id).collect();

    let staged = timeline.stage_send("doomed").unwrap();
    assert_eq!(timeline.len(), before.len() + 1);

    // Simulated durable-write failure: compensating removal by temp id
    assert!(timeline.roll_back(staged.id));

    let after: Vec<Uuid> = timeline.messages().map(|m| m.id).collect();
    assert_eq!(after, before);
}

#[test]
fn history_then_events_preserve_ascending_order() {
    let me = Uuid::new_v4();
    let peer = Uuid::new_v4();
    let mut timeline = ConversationTimeline::new(me, peer);

    let token = timeline.begin_load();
    let history = vec![message(me, peer, "one"), message(peer, me, "two")];
    timeline.apply_history(token, history);
    timeline.set_connected(true);

    timeline.apply_event(message(peer, me, "three"));

    let contents: Vec<_> = timeline.messages().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["one", "two", "three"]);
}

#[test]
fn sent_message_lands_last_in_peer_history_shape() {
    // Mirrors the end-to-end expectation: after A sends "hello", the
    // ascending sequence ends with (A, "hello")
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let mut timeline = ConversationTimeline::new(a, b);
    let token = timeline.begin_load();
    timeline.apply_history(token, vec![message(b, a, "hi A")]);
    timeline.set_connected(true);

    let staged = timeline.stage_send("hello").unwrap();
    let durable = message(a, b, "hello");
    timeline.confirm_send(staged.id, durable.clone());

    let last = timeline.messages().last().unwrap();
    assert_eq!(last.sender_id, a);
    assert_eq!(last.content, "hello");
    assert_eq!(last.id, durable.id);
}

#[derive(Debug, Clone)]
enum TimelineOp {
    /// Stage a send, then roll it back (failure path)
    FailedSend(String),
    /// Stage a send, then confirm it with a durable record
    ConfirmedSend(String),
    /// Deliver an event from the peer
    PeerEvent(String),
    /// Deliver an event from an unrelated pair
    StrangerEvent(String),
}

fn timeline_op() -> impl Strategy<Value = TimelineOp> {
    let content = "[a-z]{1,12}";
    prop_oneof![
        content.prop_map(TimelineOp::FailedSend),
        content.prop_map(TimelineOp::ConfirmedSend),
        content.prop_map(TimelineOp::PeerEvent),
        content.prop_map(TimelineOp::StrangerEvent),
    ]
}

proptest! {
    /// Whatever interleaving of sends, failures, echoes, and foreign events
    /// occurs: no duplicates, no foreign messages, no leftover pending
    /// entries, and failed sends leave no trace.
    #[test]
    fn reconciliation_invariants(ops in prop::collection::vec(timeline_op(), 0..30)) {
        let me = Uuid::new_v4();
        let peer = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let mut timeline = ConversationTimeline::new(me, peer);
        let token = timeline.begin_load();
        timeline.apply_history(token, Vec::new());
        timeline.set_connected(true);

        let mut expected_len = 0usize;

        for op in ops {
            match op {
                TimelineOp::FailedSend(content) => {
                    let staged = timeline.stage_send(&content).unwrap();
                    prop_assert!(timeline.roll_back(staged.id));
                }
                TimelineOp::ConfirmedSend(content) => {
                    let staged = timeline.stage_send(&content).unwrap();
                    let durable = message(me, peer, &content);
                    timeline.confirm_send(staged.id, durable.clone());
                    // The authoritative echo of our own broadcast
                    timeline.apply_event(durable);
                    expected_len += 1;
                }
                TimelineOp::PeerEvent(content) => {
                    prop_assert!(timeline.apply_event(message(peer, me, &content)));
                    expected_len += 1;
                }
                TimelineOp::StrangerEvent(content) => {
                    prop_assert!(!timeline.apply_event(message(stranger, me, &content)));
                }
            }
        }

        prop_assert_eq!(timeline.len(), expected_len);
        prop_assert_eq!(timeline.pending_count(), 0);

        // Every entry belongs to the pair, and ids are unique
        let mut seen = std::collections::HashSet::new();
        for msg in timeline.messages() {
            prop_assert!(msg.is_between(me, peer));
            prop_assert!(seen.insert(msg.id));
        }
    }
}
