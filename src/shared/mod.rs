//! Types shared between the Confab backend and client.
//!
//! Everything in this module is plain data: request/response DTOs, the
//! profile and message records both sides exchange, field-scoped validation,
//! and the shared error type. No I/O happens here.

pub mod error;
pub mod friends;
pub mod message;
pub mod profile;
pub mod validate;

pub use error::SharedError;
pub use friends::{
    CancelFriendRequestRequest, CancelFriendRequestResponse, FriendListResponse,
    FriendRequestStatus, IncomingFriendRequest, ListIncomingResponse, ListOutgoingResponse,
    OutgoingFriendRequest, RespondFriendRequestRequest, RespondFriendRequestResponse,
    SendFriendRequestRequest, SendFriendRequestResponse,
};
pub use message::{DirectMessage, MessageHistoryResponse, SendMessageRequest, SendMessageResponse};
pub use profile::Profile;
