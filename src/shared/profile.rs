//! Profile Data Structure
//!
//! The public view of a user. Created at registration alongside the identity
//! record and returned wherever the other party of a request, friendship, or
//! search result needs to be displayed.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public profile of a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Profile {
    /// User ID this profile belongs to
    pub id: Uuid,
    /// Display username (unique)
    pub username: String,
    /// Email address
    pub email: String,
    /// Signed URL of the avatar image, if one has been uploaded
    pub avatar_url: Option<String>,
}

/// Request to register a new account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Request to log in
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response carrying a session token and the authenticated profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub profile: Profile,
}

/// Request to change the display username
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUsernameRequest {
    pub username: String,
}

/// Request to change the account email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateEmailRequest {
    pub email: String,
}

/// Request to change the password; the current password re-authenticates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Response for profile mutations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileUpdateResponse {
    pub success: bool,
    pub error: Option<String>,
}

/// Response after an avatar upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvatarUploadResponse {
    pub success: bool,
    /// Signed retrieval URL for the uploaded image
    pub avatar_url: Option<String>,
    pub error: Option<String>,
}

/// Response for a user search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchUsersResponse {
    pub users: Vec<Profile>,
}
