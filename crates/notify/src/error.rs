//! Notification channel error types.

use thiserror::Error;

/// Messaging API errors.
///
/// Deliveries are best-effort: none of these are retried, and callers map
/// them to coded envelope outcomes instead of propagating them.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("DM channel creation rejected (status {status})")]
    InvalidRecipient { status: u16 },

    #[error("message post failed (status {status})")]
    Api { status: u16 },

    #[error("malformed API response: {0}")]
    MalformedResponse(String),
}

/// Result type for messaging operations.
pub type NotifyResult<T> = std::result::Result<T, NotifyError>;
