//! Core domain types for Beacon.
//!
//! This crate provides the vocabulary shared by every other crate:
//! - Snowflake identifiers with embedded creation time
//! - Outcome codes and the result envelope returned by every operation
//! - Event categories
//! - Environment-sourced configuration
//! - The User / Device / Event domain models

pub mod category;
pub mod codes;
pub mod config;
pub mod device;
pub mod error;
pub mod event;
pub mod snowflake;
pub mod user;

pub use codes::{Envelope, OutcomeCode};
pub use device::Device;
pub use error::{Error, Result};
pub use event::Event;
pub use snowflake::Snowflake;
pub use user::User;
