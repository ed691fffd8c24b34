//! Event domain model.

use crate::device::Device;
use crate::snowflake::Snowflake;
use serde::{Deserialize, Serialize};

/// A sensor event reported by a device.
///
/// Every measurement is optional; the firmware sends whatever its sensors
/// produced. Consumers treat a measurement group as present only when all
/// of its constituent values are present.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Event {
    /// Snowflake identifier.
    pub id: Snowflake,
    /// Event category (see [`crate::category`]).
    pub category: i32,
    /// X acceleration in g.
    pub accel_x: Option<f64>,
    /// Y acceleration in g.
    pub accel_y: Option<f64>,
    /// Z acceleration in g.
    pub accel_z: Option<f64>,
    /// X angular velocity in rad/s.
    pub gyro_x: Option<f64>,
    /// Y angular velocity in rad/s.
    pub gyro_y: Option<f64>,
    /// Z angular velocity in rad/s.
    pub gyro_z: Option<f64>,
    /// Heart rate in beats per minute.
    pub heart_rate_bpm: Option<i32>,
    /// Blood oxygen saturation percentage.
    pub spo2: Option<i32>,
    /// GPS latitude.
    pub latitude: Option<f64>,
    /// GPS longitude.
    pub longitude: Option<f64>,
    /// GPS altitude in meters (NEO-6M).
    pub neo6m_altitude_meter: Option<f64>,
    /// Atmospheric pressure in pascals.
    pub pressure_pa: Option<f64>,
    /// Barometric altitude in meters (BMP280).
    pub bmp280_altitude_meter: Option<f64>,
    /// The device that reported the event.
    pub device: Device,
}

/// A not-yet-persisted event payload.
///
/// Identifiers are minted by the storage layer, so creation inputs carry
/// no `id`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct NewEvent {
    pub category: i32,
    pub accel_x: Option<f64>,
    pub accel_y: Option<f64>,
    pub accel_z: Option<f64>,
    pub gyro_x: Option<f64>,
    pub gyro_y: Option<f64>,
    pub gyro_z: Option<f64>,
    pub heart_rate_bpm: Option<i32>,
    pub spo2: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub neo6m_altitude_meter: Option<f64>,
    pub pressure_pa: Option<f64>,
    pub bmp280_altitude_meter: Option<f64>,
}

impl Event {
    /// The creation time derived from the snowflake identifier.
    pub fn created_at(&self) -> time::OffsetDateTime {
        self.id.created_at()
    }
}
