//! Credential and session-token handling for Beacon.
//!
//! - [`CredentialHasher`]: one-way hashing of passwords and device tokens,
//!   verification, and rehash-need detection on parameter drift
//! - [`SessionSigner`]: issuance and validation of short-lived signed
//!   session tokens

pub mod error;
pub mod hasher;
pub mod session;

pub use error::{AuthError, AuthResult};
pub use hasher::CredentialHasher;
pub use session::{SESSION_TTL_SECONDS, SessionSigner};
