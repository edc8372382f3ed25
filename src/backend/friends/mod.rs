//! Friend-request lifecycle and friend lists

pub mod db;
pub mod handlers;

pub use handlers::{
    cancel_friend_request, get_friend_list, get_incoming_requests, get_outgoing_requests,
    respond_to_friend_request, send_friend_request,
};
