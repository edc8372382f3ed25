//! Field Validation
//!
//! Input validation rules shared by the registration, login, and
//! profile-update paths. Each function returns a [`SharedError::ValidationError`]
//! scoped to the offending field so the caller can render it inline.

use crate::shared::error::SharedError;

/// Maximum accepted message length, in characters.
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Validate a display username.
///
/// Usernames must be 2-50 characters after trimming.
pub fn validate_username(username: &str) -> Result<(), SharedError> {
    let trimmed = username.trim();
    if trimmed.chars().count() < 2 {
        return Err(SharedError::validation(
            "username",
            "Name must be at least 2 characters long",
        ));
    }
    if trimmed.chars().count() > 50 {
        return Err(SharedError::validation(
            "username",
            "Name must be less than 50 characters",
        ));
    }
    Ok(())
}

/// Validate an email address (basic shape check, not full RFC parsing).
pub fn validate_email(email: &str) -> Result<(), SharedError> {
    let trimmed = email.trim();
    let valid = trimmed.len() >= 3
        && trimmed.contains('@')
        && !trimmed.starts_with('@')
        && !trimmed.ends_with('@');
    if !valid {
        return Err(SharedError::validation("email", "Invalid email address"));
    }
    Ok(())
}

/// Validate a new password.
///
/// Passwords must be at least 8 characters and include an uppercase letter,
/// a lowercase letter, a digit, and a non-alphanumeric character.
pub fn validate_password(password: &str) -> Result<(), SharedError> {
    if password.chars().count() < 8 {
        return Err(SharedError::validation(
            "password",
            "Password must be at least 8 characters",
        ));
    }
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_special = password.chars().any(|c| !c.is_ascii_alphanumeric());
    if !(has_lower && has_upper && has_digit && has_special) {
        return Err(SharedError::validation(
            "password",
            "Password must include uppercase, lowercase, number, and special character",
        ));
    }
    Ok(())
}

/// Validate a password confirmation against the password itself.
pub fn validate_password_confirmation(
    password: &str,
    confirmation: &str,
) -> Result<(), SharedError> {
    if password != confirmation {
        return Err(SharedError::validation(
            "confirm_password",
            "Passwords do not match",
        ));
    }
    Ok(())
}

/// Validate message content before it is staged for sending.
pub fn validate_message_content(content: &str) -> Result<(), SharedError> {
    if content.trim().is_empty() {
        return Err(SharedError::message("Message content cannot be empty"));
    }
    if content.chars().count() > MAX_MESSAGE_LEN {
        return Err(SharedError::message("Message content is too long"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_length_bounds() {
        assert!(validate_username("al").is_ok());
        assert!(validate_username("a").is_err());
        assert!(validate_username(&"x".repeat(50)).is_ok());
        assert!(validate_username(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_username_is_trimmed() {
        assert!(validate_username("  a  ").is_err());
        assert!(validate_username("  ab  ").is_ok());
    }

    #[test]
    fn test_email_shape() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@leading").is_err());
        assert!(validate_email("trailing@").is_err());
    }

    #[test]
    fn test_password_strength() {
        assert!(validate_password("Str0ng!pass").is_ok());
        assert!(validate_password("short1!").is_err());
        assert!(validate_password("alllowercase1!").is_err());
        assert!(validate_password("ALLUPPERCASE1!").is_err());
        assert!(validate_password("NoDigits!!").is_err());
        assert!(validate_password("NoSpecial123").is_err());
    }

    #[test]
    fn test_password_confirmation() {
        assert!(validate_password_confirmation("abc", "abc").is_ok());
        let err = validate_password_confirmation("abc", "abd").unwrap_err();
        assert_eq!(err.field(), Some("confirm_password"));
    }

    #[test]
    fn test_message_content() {
        assert!(validate_message_content("hello").is_ok());
        assert!(validate_message_content("   ").is_err());
        assert!(validate_message_content(&"x".repeat(MAX_MESSAGE_LEN + 1)).is_err());
    }
}
