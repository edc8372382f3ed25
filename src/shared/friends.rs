//! Friend Request Data Structures
//!
//! Represents friend requests between users and the request/response DTOs of
//! the friend lifecycle endpoints. Declined and cancelled requests are
//! deleted rather than retained, so the only persisted statuses are pending
//! and accepted; a "declined" label shown by a UI is synthesized locally.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::profile::Profile;

/// Status of a friend request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FriendRequestStatus {
    /// Request is waiting for the recipient to react
    #[default]
    Pending,
    /// Request was accepted; a friendship row exists
    Accepted,
}

impl FriendRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FriendRequestStatus::Pending => "pending",
            FriendRequestStatus::Accepted => "accepted",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(FriendRequestStatus::Pending),
            "accepted" => Some(FriendRequestStatus::Accepted),
            _ => None,
        }
    }
}

/// A friend request addressed to the viewer, sender profile joined inline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IncomingFriendRequest {
    /// Unique request ID
    pub id: Uuid,
    /// Current status (always pending in incoming listings)
    pub status: FriendRequestStatus,
    /// Profile of the user who sent the request
    pub from: Profile,
    /// When the request was created
    pub created_at: DateTime<Utc>,
}

/// A friend request sent by the viewer, recipient profile joined inline
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutgoingFriendRequest {
    /// Unique request ID
    pub id: Uuid,
    /// Current status (pending or accepted; declined rows are deleted)
    pub status: FriendRequestStatus,
    /// Profile of the user the request was sent to
    pub to: Profile,
    /// When the request was created
    pub created_at: DateTime<Utc>,
}

/// Request to send a friend request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendFriendRequestRequest {
    /// ID of the user to send the request to
    pub to_user_id: Uuid,
}

/// Response after sending a friend request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendFriendRequestResponse {
    pub success: bool,
    pub request_id: Option<Uuid>,
    pub error: Option<String>,
}

/// Request to cancel a previously sent friend request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelFriendRequestRequest {
    /// ID of the request to cancel
    pub request_id: Uuid,
}

/// Response after cancelling a friend request
///
/// `cancelled` is false when the predicate matched no row, which covers both
/// an unknown id and a caller who is not the sender; neither case is an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelFriendRequestResponse {
    pub success: bool,
    pub cancelled: bool,
}

/// Request to react to a friend request (accept or decline)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondFriendRequestRequest {
    /// User who originally sent the request
    pub from_user: Uuid,
    /// ID of the request to react to
    pub request_id: Uuid,
    /// Whether to accept (true) or decline (false)
    pub accept: bool,
}

/// Response after reacting to a friend request
///
/// `applied` is false when no pending row matched the (id, from, to)
/// predicate: a repeated accept/decline of the same request is a no-op.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondFriendRequestResponse {
    pub success: bool,
    pub applied: bool,
    pub error: Option<String>,
}

/// Response for listing incoming friend requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListIncomingResponse {
    pub requests: Vec<IncomingFriendRequest>,
}

/// Response for listing sent friend requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListOutgoingResponse {
    pub requests: Vec<OutgoingFriendRequest>,
}

/// Response for the friend list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendListResponse {
    pub friends: Vec<Profile>,
}
