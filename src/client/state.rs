//! Client State
//!
//! The aggregate view state of one logged-in session: the current user,
//! friend and request lists, the exclusive chat selection, and the timeline
//! of the open conversation. Network results are applied through explicit
//! methods; the state itself never performs I/O.
//!
//! Lifecycle: created empty, populated after login, torn down on logout.

use uuid::Uuid;

use crate::client::session::ChatSession;
use crate::client::timeline::{ConversationTimeline, LoadToken};
use crate::shared::{IncomingFriendRequest, OutgoingFriendRequest, Profile};

/// View state owned by a single client session
#[derive(Debug, Default)]
pub struct ClientState {
    /// The logged-in user's profile
    current_user: Option<Profile>,

    /// Confirmed friends
    friends: Vec<Profile>,
    /// Pending requests addressed to this user
    incoming_requests: Vec<IncomingFriendRequest>,
    /// Requests this user has sent
    outgoing_requests: Vec<OutgoingFriendRequest>,

    /// Chat selection, draft, and search state
    session: ChatSession,
    /// Timeline of the open conversation; `Some` iff a chat is open
    timeline: Option<ConversationTimeline>,

    /// Transient error to surface to the user
    last_error: Option<String>,
}

impl ClientState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the logged-in user
    pub fn set_current_user(&mut self, profile: Profile) {
        self.current_user = Some(profile);
    }

    pub fn current_user(&self) -> Option<&Profile> {
        self.current_user.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current_user.is_some()
    }

    /// Tear everything down at logout
    pub fn logout(&mut self) {
        *self = Self::default();
    }

    /// Replace the friend list with a fetched one
    pub fn apply_friends(&mut self, friends: Vec<Profile>) {
        self.friends = friends;
    }

    pub fn friends(&self) -> &[Profile] {
        &self.friends
    }

    /// Friends filtered by the session's search query
    pub fn filtered_friends(&self) -> Vec<&Profile> {
        let query = self.session.search_query().trim().to_lowercase();
        if query.is_empty() {
            return self.friends.iter().collect();
        }
        self.friends
            .iter()
            .filter(|f| {
                f.username.to_lowercase().contains(&query)
                    || f.email.to_lowercase().contains(&query)
            })
            .collect()
    }

    /// Replace the incoming request list with a fetched one
    pub fn apply_incoming_requests(&mut self, requests: Vec<IncomingFriendRequest>) {
        self.incoming_requests = requests;
    }

    /// Replace the outgoing request list with a fetched one
    pub fn apply_outgoing_requests(&mut self, requests: Vec<OutgoingFriendRequest>) {
        self.outgoing_requests = requests;
    }

    pub fn incoming_requests(&self) -> &[IncomingFriendRequest] {
        &self.incoming_requests
    }

    pub fn outgoing_requests(&self) -> &[OutgoingFriendRequest] {
        &self.outgoing_requests
    }

    pub fn pending_request_count(&self) -> usize {
        self.incoming_requests.len()
    }

    /// Record a successful accept: the request leaves the incoming list and
    /// the sender becomes a friend immediately, ahead of the next refetch
    pub fn request_accepted(&mut self, request_id: Uuid) {
        if let Some(pos) = self
            .incoming_requests
            .iter()
            .position(|r| r.id == request_id)
        {
            let request = self.incoming_requests.remove(pos);
            if !self.friends.iter().any(|f| f.id == request.from.id) {
                self.friends.push(request.from);
            }
        }
    }

    /// Record a successful decline
    pub fn request_declined(&mut self, request_id: Uuid) {
        self.incoming_requests.retain(|r| r.id != request_id);
    }

    /// Record a successful cancel of a sent request
    pub fn request_cancelled(&mut self, request_id: Uuid) {
        self.outgoing_requests.retain(|r| r.id != request_id);
    }

    /// Open the chat with a friend
    ///
    /// Replaces any previous selection and timeline (exactly one chat may be
    /// open), and returns the load token for the history fetch. `None` when
    /// nobody is logged in.
    pub fn open_chat(&mut self, peer: Profile) -> Option<LoadToken> {
        let self_id = self.current_user.as_ref()?.id;

        let mut timeline = ConversationTimeline::new(self_id, peer.id);
        let token = timeline.begin_load();

        self.session.open_chat(peer);
        self.timeline = Some(timeline);

        Some(token)
    }

    /// Close the open chat, discarding its timeline and draft
    pub fn close_chat(&mut self) {
        self.session.close_chat();
        self.timeline = None;
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut ChatSession {
        &mut self.session
    }

    /// Timeline of the open conversation
    pub fn timeline(&self) -> Option<&ConversationTimeline> {
        self.timeline.as_ref()
    }

    pub fn timeline_mut(&mut self) -> Option<&mut ConversationTimeline> {
        self.timeline.as_mut()
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.last_error = Some(error.into());
    }

    pub fn take_error(&mut self) -> Option<String> {
        self.last_error.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::FriendRequestStatus;
    use chrono::Utc;

    fn profile(name: &str) -> Profile {
        Profile {
            id: Uuid::new_v4(),
            username: name.to_string(),
            email: format!("{}@example.com", name),
            avatar_url: None,
        }
    }

    fn incoming(from: Profile) -> IncomingFriendRequest {
        IncomingFriendRequest {
            id: Uuid::new_v4(),
            status: FriendRequestStatus::Pending,
            from,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_chat_requires_login() {
        let mut state = ClientState::new();
        assert!(state.open_chat(profile("alice")).is_none());
        assert!(state.timeline().is_none());
    }

    #[test]
    fn test_open_chat_is_exclusive() {
        let mut state = ClientState::new();
        state.set_current_user(profile("me"));

        let alice = profile("alice");
        let bob = profile("bob");

        state.open_chat(alice.clone()).unwrap();
        let first_peer = state.timeline().unwrap().peer_id();
        assert_eq!(first_peer, alice.id);

        state.open_chat(bob.clone()).unwrap();
        assert_eq!(state.timeline().unwrap().peer_id(), bob.id);
        assert_eq!(state.session().selected_peer(), Some(&bob));
    }

    #[test]
    fn test_close_chat_drops_timeline() {
        let mut state = ClientState::new();
        state.set_current_user(profile("me"));
        state.open_chat(profile("alice"));

        state.close_chat();
        assert!(state.timeline().is_none());
        assert!(!state.session().is_open());
    }

    #[test]
    fn test_accept_moves_sender_to_friends() {
        let mut state = ClientState::new();
        state.set_current_user(profile("me"));

        let alice = profile("alice");
        let request = incoming(alice.clone());
        let request_id = request.id;
        state.apply_incoming_requests(vec![request]);

        state.request_accepted(request_id);
        assert_eq!(state.pending_request_count(), 0);
        assert!(state.friends().iter().any(|f| f.id == alice.id));
    }

    #[test]
    fn test_decline_only_removes_request(){
        let mut state = ClientState::new();
        state.set_current_user(profile("me"));

        let request = incoming(profile("alice"));
        let request_id = request.id;
        state.apply_incoming_requests(vec![request]);

        state.request_declined(request_id);
        assert_eq!(state.pending_request_count(), 0);
        assert!(state.friends().is_empty());
    }

    #[test]
    fn test_filtered_friends_matches_username_and_email() {
        let mut state = ClientState::new();
        state.set_current_user(profile("me"));
        state.apply_friends(vec![profile("alice"), profile("bob")]);

        state.session_mut().set_search_query("ali");
        let filtered = state.filtered_friends();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].username, "alice");

        state.session_mut().set_search_query("");
        assert_eq!(state.filtered_friends().len(), 2);
    }

    #[test]
    fn test_logout_clears_everything() {
        let mut state = ClientState::new();
        state.set_current_user(profile("me"));
        state.apply_friends(vec![profile("alice")]);
        state.open_chat(profile("alice"));

        state.logout();
        assert!(!state.is_logged_in());
        assert!(state.friends().is_empty());
        assert!(state.timeline().is_none());
    }
}
