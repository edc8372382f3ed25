//! Authentication HTTP handlers

pub mod login;
pub mod me;
pub mod register;

pub use login::login;
pub use me::get_me;
pub use register::register;
