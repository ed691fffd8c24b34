//! Snowflake identifiers.
//!
//! Every persisted entity is keyed by a 64-bit identifier whose upper bits
//! encode the creation time: milliseconds since the Beacon epoch, shifted
//! left by 12 bits, with an opaque per-issuer discriminator in the low 12
//! bits. Identifiers are minted by the storage layer; this module only
//! interprets them.

use serde::{Deserialize, Serialize};
use std::fmt;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

/// Epoch from which snowflake timestamps are counted.
pub const SNOWFLAKE_EPOCH: OffsetDateTime = datetime!(2020-01-01 0:00 UTC);

/// Number of low bits reserved for the issuer discriminator.
pub const DISCRIMINANT_BITS: u8 = 12;

/// A 64-bit identifier with an embedded creation timestamp.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snowflake(pub i64);

impl Snowflake {
    /// The creation time embedded in this identifier.
    ///
    /// Holds for all non-negative identifiers; identifiers minted in order
    /// by a single issuer decode to non-decreasing timestamps.
    pub fn created_at(self) -> OffsetDateTime {
        let milliseconds = self.0 >> DISCRIMINANT_BITS;
        SNOWFLAKE_EPOCH + Duration::milliseconds(milliseconds)
    }

    /// The raw identifier value.
    pub fn value(self) -> i64 {
        self.0
    }
}

impl From<i64> for Snowflake {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Snowflake({})", self.0)
    }
}

impl fmt::Display for Snowflake {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
