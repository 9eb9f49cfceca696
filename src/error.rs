//! Custom error types for CardBelcher.
//!
//! This module provides a centralized error handling system with specific error types
//! for the different collaborators the bot talks to, plus the backoff tiers used
//! when a forum call has to be retried.

use std::fmt;
use std::time::Duration;

/// Main error type for CardBelcher operations.
#[derive(Debug)]
pub enum BelcherError {
    /// Configuration errors (missing env vars, invalid values)
    Config(String),
    /// Database operation errors
    Database(String),
    /// Collectible call-counter errors
    Counter(String),
    /// Card catalog (Scryfall) errors
    Catalog(String),
    /// The forum answered with a 5xx status
    ForumServer(String),
    /// The forum request never completed (connect, timeout, body read)
    ForumRequest(String),
    /// The forum answered with an unexpected non-success status
    ForumResponse(String),
    /// The forum accepted the request but reported API errors in the payload
    ForumApi(String),
    /// Login was refused
    Auth(String),
    /// Validation errors (invalid names, out of range numbers, etc.)
    Validation(String),
    /// Generic I/O errors
    Io(std::io::Error),
}

impl BelcherError {
    /// Backoff before retrying the operation that produced this error.
    ///
    /// Returns `None` for errors that retrying will not fix, and for
    /// [`Counter`](Self::Counter) errors: a failed collectible delivery leaves
    /// its cooldown untouched, so the next call of that collectible retries it
    /// without holding up the loop.
    pub fn retry_delay(&self) -> Option<Duration> {
        match self {
            Self::ForumServer(_) => Some(Duration::from_secs(300)),
            Self::ForumRequest(_) => Some(Duration::from_secs(10)),
            Self::ForumResponse(_) => Some(Duration::from_secs(30)),
            Self::ForumApi(_) => Some(Duration::from_secs(30)),
            _ => None,
        }
    }

    /// Whether the orchestrator should back off and try again.
    pub fn is_retryable(&self) -> bool {
        self.retry_delay().is_some()
    }
}

impl fmt::Display for BelcherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "Configuration error: {}", msg),
            Self::Database(msg) => write!(f, "Database error: {}", msg),
            Self::Counter(msg) => write!(f, "Counter error: {}", msg),
            Self::Catalog(msg) => write!(f, "Catalog error: {}", msg),
            Self::ForumServer(msg) => write!(f, "Forum server error: {}", msg),
            Self::ForumRequest(msg) => write!(f, "Forum request error: {}", msg),
            Self::ForumResponse(msg) => write!(f, "Forum response error: {}", msg),
            Self::ForumApi(msg) => write!(f, "Forum API error: {}", msg),
            Self::Auth(msg) => write!(f, "Authentication error: {}", msg),
            Self::Validation(msg) => write!(f, "Validation error: {}", msg),
            Self::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for BelcherError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BelcherError::Io(err) => Some(err),
            _ => None,
        }
    }
}

// Implement From traits for automatic error conversion
impl From<std::io::Error> for BelcherError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<rusqlite::Error> for BelcherError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<std::env::VarError> for BelcherError {
    fn from(err: std::env::VarError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<regex::Error> for BelcherError {
    fn from(err: regex::Error) -> Self {
        Self::Config(format!("Invalid pattern: {}", err))
    }
}

impl From<tokio::task::JoinError> for BelcherError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Database(format!("Task join error: {}", err))
    }
}

/// Result type alias for CardBelcher operations.
pub type Result<T> = std::result::Result<T, BelcherError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_tiers() {
        assert_eq!(
            BelcherError::ForumServer("502".into()).retry_delay(),
            Some(Duration::from_secs(300))
        );
        assert_eq!(
            BelcherError::ForumRequest("timeout".into()).retry_delay(),
            Some(Duration::from_secs(10))
        );
        assert_eq!(
            BelcherError::ForumResponse("404".into()).retry_delay(),
            Some(Duration::from_secs(30))
        );
        assert_eq!(
            BelcherError::ForumApi("RATELIMIT".into()).retry_delay(),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!BelcherError::Config("missing".into()).is_retryable());
        assert!(!BelcherError::Auth("bad password".into()).is_retryable());
        // Retried by the next call of the collectible, not by a backoff.
        assert_eq!(BelcherError::Counter("locked".into()).retry_delay(), None);
    }

    #[test]
    fn test_display_prefixes() {
        let err = BelcherError::Catalog("no such card".into());
        assert_eq!(err.to_string(), "Catalog error: no such card");

        let err = BelcherError::Io(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(err.to_string().starts_with("I/O error"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
