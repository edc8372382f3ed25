//! Identity: users, sessions, and authentication handlers

pub mod handlers;
pub mod sessions;
pub mod users;

pub use handlers::{get_me, login, register};
