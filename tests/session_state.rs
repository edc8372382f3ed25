//! Selection state machine tests
//!
//! Exercises the exclusive single-open-chat invariant across arbitrary
//! operation sequences.

use proptest::prelude::*;
use uuid::Uuid;

use confab::client::{ChatSession, ClientState};
use confab::shared::Profile;

fn profile(name: &str) -> Profile {
    Profile {
        id: Uuid::new_v4(),
        username: name.to_string(),
        email: format!("{}@example.com", name),
        avatar_url: None,
    }
}

#[derive(Debug, Clone)]
enum SessionOp {
    Open(u8),
    Close,
    SetDraft(String),
}

fn session_op() -> impl Strategy<Value = SessionOp> {
    prop_oneof![
        (0u8..5).prop_map(SessionOp::Open),
        Just(SessionOp::Close),
        "[a-z ]{0,20}".prop_map(SessionOp::SetDraft),
    ]
}

proptest! {
    /// After any operation sequence there is at most one selected peer, and
    /// it is always the most recently opened one.
    #[test]
    fn selection_is_exclusive_and_last_wins(ops in prop::collection::vec(session_op(), 0..40)) {
        let peers: Vec<Profile> = (0..5).map(|i| profile(&format!("peer{}", i))).collect();
        let mut session = ChatSession::new();
        let mut expected: Option<Uuid> = None;

        for op in ops {
            match op {
                SessionOp::Open(i) => {
                    let peer = peers[i as usize].clone();
                    expected = Some(peer.id);
                    session.open_chat(peer);
                }
                SessionOp::Close => {
                    expected = None;
                    session.close_chat();
                }
                SessionOp::SetDraft(text) => {
                    session.set_draft(text);
                }
            }

            prop_assert_eq!(session.selected_peer().map(|p| p.id), expected);
            prop_assert_eq!(session.is_open(), expected.is_some());
        }
    }

    /// Opening a chat always discards the draft, whatever was typed before.
    #[test]
    fn open_always_clears_draft(draft in "[a-z ]{1,30}") {
        let mut session = ChatSession::new();
        session.open_chat(profile("alice"));
        session.set_draft(draft);
        session.open_chat(profile("bob"));
        prop_assert_eq!(session.draft(), "");
    }
}

#[test]
fn client_state_keeps_one_timeline() {
    let mut state = ClientState::new();
    state.set_current_user(profile("me"));

    let alice = profile("alice");
    let bob = profile("bob");

    state.open_chat(alice).unwrap();
    state.open_chat(bob.clone()).unwrap();

    // Only the latest conversation's timeline exists
    assert_eq!(state.timeline().unwrap().peer_id(), bob.id);
    assert_eq!(state.session().selected_peer().map(|p| p.id), Some(bob.id));
}

#[test]
fn reopening_resets_the_timeline() {
    let mut state = ClientState::new();
    state.set_current_user(profile("me"));
    let alice = profile("alice");

    let token = state.open_chat(alice.clone()).unwrap();
    let timeline = state.timeline_mut().unwrap();
    timeline.apply_history(token, Vec::new());
    timeline.set_connected(true);
    let staged = timeline.stage_send("hello").unwrap();
    assert_eq!(timeline.len(), 1);

    // Reopening the same peer starts a fresh, unloaded timeline
    state.open_chat(alice).unwrap();
    let timeline = state.timeline().unwrap();
    assert!(!timeline.is_loaded());
    assert_eq!(timeline.len(), 0);
    assert!(!timeline.messages().any(|m| m.id == staged.id));
}
