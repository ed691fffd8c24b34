//! User domain model.

use crate::snowflake::Snowflake;
use serde::{Deserialize, Serialize};

/// A registered user.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct User {
    /// Snowflake identifier.
    pub id: Snowflake,
    /// Unique username.
    pub username: String,
    /// The user's Discord DM channel, created at registration.
    pub discord_channel_id: i64,
    /// Stored form of the password (PHC string). Never plaintext.
    pub hashed_password: String,
}
