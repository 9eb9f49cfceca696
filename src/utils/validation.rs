//! Validation utilities for configuration input.
//!
//! This module provides reusable validation functions for forum names.

use crate::error::{BelcherError, Result};

/// Validate a subreddit name.
///
/// Subreddit names must:
/// - Be between 3 and 21 characters
/// - Contain only alphanumeric characters and underscores
///
/// # Arguments
///
/// * `name` - The subreddit name, without the `r/` prefix
///
/// # Returns
///
/// Returns `Ok(())` if the name is valid, otherwise returns an error describing the issue.
///
/// # Examples
///
/// ```
/// use cardbelcher::utils::validation::validate_subreddit_name;
///
/// assert!(validate_subreddit_name("magicthecirclejerking").is_ok());
/// assert!(validate_subreddit_name("MTGCardBelcher_dev").is_ok());
/// assert!(validate_subreddit_name("ab").is_err());
/// assert!(validate_subreddit_name("r/mtg").is_err());
/// ```
pub fn validate_subreddit_name(name: &str) -> Result<()> {
    if name.len() < 3 {
        return Err(BelcherError::Validation(
            format!("Subreddit name too short: '{}' (min 3 characters)", name)
        ));
    }

    if name.len() > 21 {
        return Err(BelcherError::Validation(
            format!("Subreddit name too long: {} characters (max 21)", name.len())
        ));
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(BelcherError::Validation(
            format!("Subreddit name '{}' can only contain letters, numbers, and underscores", name)
        ));
    }

    Ok(())
}

/// Validate a forum username.
///
/// Usernames must:
/// - Be between 3 and 20 characters
/// - Contain only alphanumeric characters, underscores and dashes
///
/// # Examples
///
/// ```
/// use cardbelcher::utils::validation::validate_username;
///
/// assert!(validate_username("MTGCardFetcher").is_ok());
/// assert!(validate_username("card-belcher_2").is_ok());
/// assert!(validate_username("Invalid Name").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<()> {
    if username.len() < 3 || username.len() > 20 {
        return Err(BelcherError::Validation(
            format!("Username '{}' must be between 3 and 20 characters", username)
        ));
    }

    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err(BelcherError::Validation(
            "Username can only contain letters, numbers, underscores and dashes".to_string()
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_subreddit_name() {
        // Valid names
        assert!(validate_subreddit_name("mtg").is_ok());
        assert!(validate_subreddit_name("MTGCardBelcher").is_ok());
        assert!(validate_subreddit_name("MTGCardBelcher_dev").is_ok());
        assert!(validate_subreddit_name("123456789012345678901").is_ok()); // 21 chars

        // Invalid names
        assert!(validate_subreddit_name("").is_err());
        assert!(validate_subreddit_name("ab").is_err());
        assert!(validate_subreddit_name("1234567890123456789012").is_err()); // 22 chars
        assert!(validate_subreddit_name("magic the").is_err()); // space
        assert!(validate_subreddit_name("card-belcher").is_err()); // dash
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("MTGCardBelcher").is_ok());
        assert!(validate_username("a-b").is_ok());
        assert!(validate_username("12345678901234567890").is_ok()); // 20 chars

        assert!(validate_username("ab").is_err());
        assert!(validate_username("123456789012345678901").is_err()); // 21 chars
        assert!(validate_username("Player@123").is_err());
        assert!(validate_username("").is_err());
    }
}
