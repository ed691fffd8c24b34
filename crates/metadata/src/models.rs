//! Row models mapping to the read views.
//!
//! The views expose prefixed column names (`user_*`, `device_*`,
//! `event_*`) so the joined rows can be decoded with `#[sqlx(flatten)]`
//! into nested structures, then converted into the core domain models.

use beacon_core::{Device, Event, Snowflake, User};
use sqlx::FromRow;

/// Row of `view_users` (also returned by `create_user`).
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub user_id: i64,
    pub user_username: String,
    pub user_discord_channel_id: i64,
    pub user_hashed_password: String,
}

/// Row of `view_devices` (also returned by `create_device`).
///
/// Carries the owning user's columns from the join.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceRow {
    pub device_id: i64,
    pub device_name: String,
    pub device_hashed_token: String,
    #[sqlx(flatten)]
    pub user: UserRow,
}

/// Row of `view_events` (also returned by `create_event`).
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub event_id: i64,
    pub event_category: i32,
    pub event_accel_x: Option<f64>,
    pub event_accel_y: Option<f64>,
    pub event_accel_z: Option<f64>,
    pub event_gyro_x: Option<f64>,
    pub event_gyro_y: Option<f64>,
    pub event_gyro_z: Option<f64>,
    pub event_heart_rate_bpm: Option<i32>,
    pub event_spo2: Option<i32>,
    pub event_latitude: Option<f64>,
    pub event_longitude: Option<f64>,
    pub event_neo6m_altitude_meter: Option<f64>,
    pub event_pressure_pa: Option<f64>,
    pub event_bmp280_altitude_meter: Option<f64>,
    #[sqlx(flatten)]
    pub device: DeviceRow,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: Snowflake(row.user_id),
            username: row.user_username,
            discord_channel_id: row.user_discord_channel_id,
            hashed_password: row.user_hashed_password,
        }
    }
}

impl From<DeviceRow> for Device {
    fn from(row: DeviceRow) -> Self {
        Self {
            id: Snowflake(row.device_id),
            name: row.device_name,
            hashed_token: row.device_hashed_token,
            user: row.user.into(),
        }
    }
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: Snowflake(row.event_id),
            category: row.event_category,
            accel_x: row.event_accel_x,
            accel_y: row.event_accel_y,
            accel_z: row.event_accel_z,
            gyro_x: row.event_gyro_x,
            gyro_y: row.event_gyro_y,
            gyro_z: row.event_gyro_z,
            heart_rate_bpm: row.event_heart_rate_bpm,
            spo2: row.event_spo2,
            latitude: row.event_latitude,
            longitude: row.event_longitude,
            neo6m_altitude_meter: row.event_neo6m_altitude_meter,
            pressure_pa: row.event_pressure_pa,
            bmp280_altitude_meter: row.event_bmp280_altitude_meter,
            device: row.device.into(),
        }
    }
}
