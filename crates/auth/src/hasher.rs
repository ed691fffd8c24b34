//! Credential hashing and verification.

use crate::error::{AuthError, AuthResult};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{ARGON2ID_IDENT, Argon2, Params, Version};

/// One-way hasher for passwords and device tokens.
///
/// Secrets are stored in the self-describing PHC format, embedding the
/// algorithm, its parameters, and the salt. The stored form is never
/// reversible and plaintext is never persisted or logged.
pub struct CredentialHasher {
    inner: Argon2<'static>,
}

impl CredentialHasher {
    /// Create a hasher with the current target parameters (Argon2id,
    /// version 0x13, default cost).
    pub fn new() -> Self {
        Self {
            inner: Argon2::default(),
        }
    }

    /// Hash a secret into its stored form with a fresh random salt.
    pub fn hash(&self, secret: &str) -> AuthResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hashed = self
            .inner
            .hash_password(secret.as_bytes(), &salt)
            .map_err(|err| AuthError::Hashing(err.to_string()))?;
        Ok(hashed.to_string())
    }

    /// Verify a candidate secret against a stored form.
    ///
    /// A mismatch is a normal outcome, not a fault: malformed stored forms
    /// and wrong candidates both report `false`.
    pub fn verify(&self, stored: &str, candidate: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return false;
        };
        self.inner
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }

    /// Whether a stored form was produced with parameters that differ from
    /// the current target and should be re-hashed on the next successful
    /// verification.
    pub fn needs_rehash(&self, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            return true;
        };
        if parsed.algorithm != ARGON2ID_IDENT {
            return true;
        }
        if parsed.version != Some(Version::V0x13.into()) {
            return true;
        }
        match Params::try_from(&parsed) {
            Ok(params) => params != *self.inner.params(),
            Err(_) => true,
        }
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}
