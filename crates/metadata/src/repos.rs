//! Repository traits.
//!
//! Every storage operation the domain layer needs, one trait per entity.
//! `Ok(None)` / empty vectors are the expected not-found outcomes; only
//! query faults and conflicts surface as errors.

use crate::error::MetadataResult;
use crate::models::{DeviceRow, EventRow, UserRow};
use async_trait::async_trait;
use beacon_core::event::NewEvent;

/// Repository for user records.
#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Get a user by identifier.
    async fn get_user(&self, id: i64) -> MetadataResult<Option<UserRow>>;

    /// Get a user by username.
    async fn get_user_by_username(&self, username: &str) -> MetadataResult<Option<UserRow>>;

    /// Create a user. A username collision is a
    /// [`MetadataError::Conflict`](crate::error::MetadataError::Conflict).
    async fn create_user(
        &self,
        username: &str,
        discord_channel_id: i64,
        hashed_password: &str,
    ) -> MetadataResult<UserRow>;

    /// Replace a user's stored password form (credential rehash).
    async fn update_user_password(&self, id: i64, hashed_password: &str) -> MetadataResult<()>;
}

/// Repository for device records.
#[async_trait]
pub trait DeviceRepo: Send + Sync {
    /// Get a device by identifier.
    async fn get_device(&self, id: i64) -> MetadataResult<Option<DeviceRow>>;

    /// List all devices owned by a user.
    async fn list_devices(&self, user_id: i64) -> MetadataResult<Vec<DeviceRow>>;

    /// Create a device for a user.
    async fn create_device(
        &self,
        name: &str,
        hashed_token: &str,
        user_id: i64,
    ) -> MetadataResult<DeviceRow>;

    /// Replace a device's stored token form (credential rehash).
    async fn update_device_token(&self, id: i64, hashed_token: &str) -> MetadataResult<()>;
}

/// Repository for event records.
#[async_trait]
pub trait EventRepo: Send + Sync {
    /// List all events of a device, scoped to its owner.
    async fn list_events(&self, device_id: i64, user_id: i64) -> MetadataResult<Vec<EventRow>>;

    /// Persist an event for a device. The storage layer mints the
    /// identifier.
    async fn create_event(&self, event: &NewEvent, device_id: i64) -> MetadataResult<EventRow>;
}
