//! Device domain model.

use crate::snowflake::Snowflake;
use crate::user::User;
use serde::{Deserialize, Serialize};

/// A registered sensor device.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Device {
    /// Snowflake identifier.
    pub id: Snowflake,
    /// Human-readable device name.
    pub name: String,
    /// Stored form of the device token (PHC string). Never plaintext.
    pub hashed_token: String,
    /// The owning user.
    pub user: User,
}
