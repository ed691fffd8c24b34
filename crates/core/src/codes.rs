//! Outcome codes and the result envelope.
//!
//! Every storage- or network-backed operation returns an [`Envelope`]
//! pairing an [`OutcomeCode`] with an optional payload instead of raising.
//! Callers branch on the code; expected failures (not-found, bad
//! credentials, external API errors) never cross an operation boundary as
//! an `Err`.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Fixed outcome taxonomy. Values are wire-stable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum OutcomeCode {
    /// The operation succeeded.
    #[default]
    Success = 0,
    /// The connection pool is unavailable or a query faulted.
    DatabaseFailure = 1,
    /// No user with the given identifier.
    UserNotFound = 2,
    /// No device with the given identifier.
    DeviceNotFound = 3,
    /// Bad password or device token.
    IncorrectCredentials = 4,
    /// Username uniqueness violation on create.
    DuplicateUsername = 5,
    /// The external DM-channel creation was rejected.
    InvalidDiscordUserId = 6,
    /// The external message post failed.
    DiscordApiError = 7,
}

impl OutcomeCode {
    /// Wire value of this code.
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Parse a wire value.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::Success),
            1 => Some(Self::DatabaseFailure),
            2 => Some(Self::UserNotFound),
            3 => Some(Self::DeviceNotFound),
            4 => Some(Self::IncorrectCredentials),
            5 => Some(Self::DuplicateUsername),
            6 => Some(Self::InvalidDiscordUserId),
            7 => Some(Self::DiscordApiError),
            _ => None,
        }
    }

    /// Whether this code is [`OutcomeCode::Success`].
    pub fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl Serialize for OutcomeCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.as_u16())
    }
}

impl<'de> Deserialize<'de> for OutcomeCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u16::deserialize(deserializer)?;
        Self::from_u16(value)
            .ok_or_else(|| de::Error::custom(format!("unknown outcome code: {value}")))
    }
}

/// Uniform result wrapper for all domain operations.
///
/// A non-success code implies the payload is absent.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// The outcome code of the operation.
    pub code: OutcomeCode,
    /// The payload of the operation, present on success.
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// A successful envelope carrying a payload.
    pub fn ok(data: T) -> Self {
        Self {
            code: OutcomeCode::Success,
            data: Some(data),
        }
    }

    /// A successful envelope with no payload.
    pub fn empty() -> Self {
        Self {
            code: OutcomeCode::Success,
            data: None,
        }
    }

    /// A failed envelope carrying only the outcome code.
    pub fn failure(code: OutcomeCode) -> Self {
        debug_assert!(!code.is_success());
        Self { code, data: None }
    }

    /// Whether the operation succeeded.
    pub fn is_success(&self) -> bool {
        self.code.is_success()
    }

    /// Map the payload type, preserving the code.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            code: self.code,
            data: self.data.map(f),
        }
    }
}
