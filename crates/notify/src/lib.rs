//! Discord notification channel for Beacon.
//!
//! - [`DiscordClient`]: authenticated HTTP access to the messaging API
//!   (DM-channel creation, message posting, bot profile lookup)
//! - [`embed`]: the structured message model
//! - [`dispatch`]: alert qualification and message assembly for sensor
//!   events

pub mod client;
pub mod dispatch;
pub mod embed;
pub mod error;

pub use client::DiscordClient;
pub use embed::{Embed, EmbedField, EmbedFooter, EmbedThumbnail};
pub use error::{NotifyError, NotifyResult};
