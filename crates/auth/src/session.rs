//! Session token issuance and validation.

use crate::error::{AuthError, AuthResult};
use ed25519_dalek::SigningKey;
use ed25519_dalek::pkcs8::spki::der::pem::LineEnding;
use ed25519_dalek::pkcs8::{DecodePrivateKey, EncodePrivateKey};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Session token lifetime. Expiry is the only deactivation mechanism;
/// tokens are stateless and there is no server-side revocation list.
pub const SESSION_TTL_SECONDS: i64 = 900;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issuer and validator of short-lived bearer tokens.
///
/// Tokens are JWTs signed with an Ed25519 key held for the lifetime of the
/// process. Validation checks signature and expiry with zero leeway; every
/// failure mode collapses to a single invalid outcome.
pub struct SessionSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    header: Header,
    validation: Validation,
}

impl SessionSigner {
    /// Build a signer from a PKCS#8 PEM-encoded Ed25519 private key.
    ///
    /// The verification key is derived from the same private key, so a
    /// single key file configures both directions.
    pub fn from_pem(pem: &str) -> AuthResult<Self> {
        let signing_key = SigningKey::from_pkcs8_pem(pem)
            .map_err(|err| AuthError::KeyParsing(format!("invalid Ed25519 PEM: {err}")))?;
        let encoding = EncodingKey::from_ed_pem(pem.as_bytes())
            .map_err(|err| AuthError::KeyParsing(format!("invalid signing key: {err}")))?;
        let decoding = DecodingKey::from_ed_der(signing_key.verifying_key().as_bytes());

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.leeway = 0;

        Ok(Self {
            encoding,
            decoding,
            header: Header::new(Algorithm::EdDSA),
            validation,
        })
    }

    /// Generate a signer with a fresh random key.
    ///
    /// Sessions issued by it die with the process; meant for tests and
    /// local development.
    pub fn generate() -> AuthResult<Self> {
        let signing_key = SigningKey::generate(&mut rand_core::OsRng);
        let pem = signing_key
            .to_pkcs8_pem(LineEnding::LF)
            .map_err(|err| AuthError::KeyParsing(format!("key encoding failed: {err}")))?;
        Self::from_pem(&pem)
    }

    /// Issue a token for a subject, valid for [`SESSION_TTL_SECONDS`].
    pub fn issue(&self, subject: i64) -> AuthResult<String> {
        self.issue_at(subject, OffsetDateTime::now_utc().unix_timestamp())
    }

    fn issue_at(&self, subject: i64, issued_at: i64) -> AuthResult<String> {
        let claims = Claims {
            sub: subject.to_string(),
            iat: issued_at,
            exp: issued_at + SESSION_TTL_SECONDS,
        };
        encode(&self.header, &claims, &self.encoding)
            .map_err(|err| AuthError::TokenEncoding(err.to_string()))
    }

    /// Validate a token, returning the embedded subject.
    ///
    /// Bad signature, malformed token, and expiry all collapse to `None`;
    /// callers cannot (and must not) distinguish them.
    pub fn validate(&self, token: &str) -> Option<String> {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Some(data.claims.sub),
            Err(_) => None,
        }
    }
}

impl fmt::Debug for SessionSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionSigner([REDACTED])")
    }
}
