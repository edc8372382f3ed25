//! Backend error types and HTTP conversions

pub mod conversion;
pub mod types;

pub use types::ApiError;
