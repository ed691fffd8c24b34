//! Error types for credential and token handling.

use thiserror::Error;

/// Credential and token handling errors.
///
/// Verification mismatches are NOT errors; they are normal outcomes
/// reported through the return values of `verify`/`validate`.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("hashing failed: {0}")]
    Hashing(String),

    #[error("key parsing failed: {0}")]
    KeyParsing(String),

    #[error("token encoding failed: {0}")]
    TokenEncoding(String),
}

/// Result type for credential and token operations.
pub type AuthResult<T> = std::result::Result<T, AuthError>;
