//! Chat Selection State
//!
//! The single-open-chat state machine. States are {Closed, Open(peer)};
//! opening a chat replaces any previous selection unconditionally and
//! discards the unsent draft. There is never more than one open chat.

use crate::shared::Profile;

/// Which chat surface is active
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChatSelection {
    /// No chat is open
    #[default]
    Closed,
    /// A chat with the given peer is open
    Open(Profile),
}

/// Per-session chat selection, draft, and contact search state
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    selection: ChatSelection,
    /// Composed-but-unsent message text
    draft: String,
    /// Contact list filter
    search_query: String,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a chat with a peer
    ///
    /// Closed -> Open(peer), or Open(x) -> Open(peer). Any unsent draft
    /// belongs to the previous conversation and is discarded.
    pub fn open_chat(&mut self, peer: Profile) {
        self.draft.clear();
        self.selection = ChatSelection::Open(peer);
    }

    /// Close the open chat, if any
    pub fn close_chat(&mut self) {
        self.draft.clear();
        self.selection = ChatSelection::Closed;
    }

    /// The currently selected peer
    pub fn selected_peer(&self) -> Option<&Profile> {
        match &self.selection {
            ChatSelection::Open(peer) => Some(peer),
            ChatSelection::Closed => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.selection, ChatSelection::Open(_))
    }

    pub fn selection(&self) -> &ChatSelection {
        &self.selection
    }

    /// Replace the draft text
    pub fn set_draft(&mut self, draft: impl Into<String>) {
        self.draft = draft.into();
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Take the draft out for sending, leaving it empty
    pub fn take_draft(&mut self) -> String {
        std::mem::take(&mut self.draft)
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }
}
