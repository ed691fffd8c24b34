//! In-memory repository implementations for domain tests.

use async_trait::async_trait;
use beacon_core::event::NewEvent;
use beacon_metadata::models::{DeviceRow, EventRow, UserRow};
use beacon_metadata::repos::{DeviceRepo, EventRepo, UserRepo};
use beacon_metadata::{MetadataError, MetadataResult};
use std::sync::{Arc, Mutex};

/// In-memory store. Mints snowflake-shaped identifiers (monotonic counter
/// in the timestamp bits) and records credential updates so rehash
/// behavior can be asserted.
#[derive(Clone, Default)]
pub struct MockStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    users: Vec<UserRow>,
    devices: Vec<DeviceRow>,
    events: Vec<EventRow>,
    next_id: i64,
    password_updates: Vec<(i64, String)>,
    token_updates: Vec<(i64, String)>,
}

impl Inner {
    fn mint(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id << 12
    }
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self, username: &str, discord_channel_id: i64, hashed_password: &str) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.mint();
        inner.users.push(UserRow {
            user_id: id,
            user_username: username.to_string(),
            user_discord_channel_id: discord_channel_id,
            user_hashed_password: hashed_password.to_string(),
        });
        id
    }

    pub fn add_device(&self, name: &str, hashed_token: &str, user_id: i64) -> i64 {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .iter()
            .find(|user| user.user_id == user_id)
            .expect("device owner must exist")
            .clone();
        let id = inner.mint();
        inner.devices.push(DeviceRow {
            device_id: id,
            device_name: name.to_string(),
            device_hashed_token: hashed_token.to_string(),
            user,
        });
        id
    }

    pub fn password_updates(&self) -> Vec<(i64, String)> {
        self.inner.lock().unwrap().password_updates.clone()
    }

    pub fn token_updates(&self) -> Vec<(i64, String)> {
        self.inner.lock().unwrap().token_updates.clone()
    }

    pub fn stored_password(&self, user_id: i64) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|user| user.user_id == user_id)
            .map(|user| user.user_hashed_password.clone())
    }

    pub fn stored_token(&self, device_id: i64) -> Option<String> {
        self.inner
            .lock()
            .unwrap()
            .devices
            .iter()
            .find(|device| device.device_id == device_id)
            .map(|device| device.device_hashed_token.clone())
    }

    pub fn event_count(&self) -> usize {
        self.inner.lock().unwrap().events.len()
    }
}

#[async_trait]
impl UserRepo for MockStore {
    async fn get_user(&self, id: i64) -> MetadataResult<Option<UserRow>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.iter().find(|user| user.user_id == id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> MetadataResult<Option<UserRow>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .iter()
            .find(|user| user.user_username == username)
            .cloned())
    }

    async fn create_user(
        &self,
        username: &str,
        discord_channel_id: i64,
        hashed_password: &str,
    ) -> MetadataResult<UserRow> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.iter().any(|user| user.user_username == username) {
            return Err(MetadataError::Conflict(format!(
                "username '{username}' already exists"
            )));
        }
        let id = inner.mint();
        let row = UserRow {
            user_id: id,
            user_username: username.to_string(),
            user_discord_channel_id: discord_channel_id,
            user_hashed_password: hashed_password.to_string(),
        };
        inner.users.push(row.clone());
        Ok(row)
    }

    async fn update_user_password(&self, id: i64, hashed_password: &str) -> MetadataResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(user) = inner.users.iter_mut().find(|user| user.user_id == id) {
            user.user_hashed_password = hashed_password.to_string();
        }
        inner
            .password_updates
            .push((id, hashed_password.to_string()));
        Ok(())
    }
}

#[async_trait]
impl DeviceRepo for MockStore {
    async fn get_device(&self, id: i64) -> MetadataResult<Option<DeviceRow>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .devices
            .iter()
            .find(|device| device.device_id == id)
            .cloned())
    }

    async fn list_devices(&self, user_id: i64) -> MetadataResult<Vec<DeviceRow>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .devices
            .iter()
            .filter(|device| device.user.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_device(
        &self,
        name: &str,
        hashed_token: &str,
        user_id: i64,
    ) -> MetadataResult<DeviceRow> {
        let mut inner = self.inner.lock().unwrap();
        let user = inner
            .users
            .iter()
            .find(|user| user.user_id == user_id)
            .cloned()
            .ok_or(MetadataError::Database(sqlx_row_not_found()))?;
        let id = inner.mint();
        let row = DeviceRow {
            device_id: id,
            device_name: name.to_string(),
            device_hashed_token: hashed_token.to_string(),
            user,
        };
        inner.devices.push(row.clone());
        Ok(row)
    }

    async fn update_device_token(&self, id: i64, hashed_token: &str) -> MetadataResult<()> {
        let mut inner = self.inner.lock().unwrap();
        if let Some(device) = inner.devices.iter_mut().find(|device| device.device_id == id) {
            device.device_hashed_token = hashed_token.to_string();
        }
        inner.token_updates.push((id, hashed_token.to_string()));
        Ok(())
    }
}

#[async_trait]
impl EventRepo for MockStore {
    async fn list_events(&self, device_id: i64, user_id: i64) -> MetadataResult<Vec<EventRow>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .events
            .iter()
            .filter(|event| {
                event.device.device_id == device_id && event.device.user.user_id == user_id
            })
            .cloned()
            .collect())
    }

    async fn create_event(&self, event: &NewEvent, device_id: i64) -> MetadataResult<EventRow> {
        let mut inner = self.inner.lock().unwrap();
        let device = inner
            .devices
            .iter()
            .find(|device| device.device_id == device_id)
            .cloned()
            .ok_or(MetadataError::Database(sqlx_row_not_found()))?;
        let id = inner.mint();
        let row = EventRow {
            event_id: id,
            event_category: event.category,
            event_accel_x: event.accel_x,
            event_accel_y: event.accel_y,
            event_accel_z: event.accel_z,
            event_gyro_x: event.gyro_x,
            event_gyro_y: event.gyro_y,
            event_gyro_z: event.gyro_z,
            event_heart_rate_bpm: event.heart_rate_bpm,
            event_spo2: event.spo2,
            event_latitude: event.latitude,
            event_longitude: event.longitude,
            event_neo6m_altitude_meter: event.neo6m_altitude_meter,
            event_pressure_pa: event.pressure_pa,
            event_bmp280_altitude_meter: event.bmp280_altitude_meter,
            device,
        };
        inner.events.push(row.clone());
        Ok(row)
    }
}

fn sqlx_row_not_found() -> sqlx::Error {
    sqlx::Error::RowNotFound
}
