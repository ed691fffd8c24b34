//! Event categories.
//!
//! Categories are small integers chosen by the reporting firmware. Only
//! fall events fan out to the external messaging channel.

/// A fall was detected by the device.
pub const FALL_DETECTED: i32 = 1;

/// Whether events of this category are forwarded as alerts.
pub fn is_alert(category: i32) -> bool {
    matches!(category, FALL_DETECTED)
}
