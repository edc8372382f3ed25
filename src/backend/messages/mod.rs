//! Direct messages: storage and handlers

pub mod db;
pub mod handlers;

pub use handlers::{get_history, send_message};
