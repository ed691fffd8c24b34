//! Alert qualification and message assembly for sensor events.

use crate::client::DiscordClient;
use crate::embed::{Embed, EmbedField, EmbedFooter, EmbedThumbnail};
use crate::error::NotifyResult;
use beacon_core::{Event, category};

/// Accent color of alert embeds.
const ALERT_COLOR: u32 = 0x2ECC71;

/// Message body accompanying every alert embed.
pub const ALERT_CONTENT: &str = "A new sensor event has been detected.";

/// Whether a persisted event qualifies for external notification.
pub fn qualifies(event: &Event) -> bool {
    category::is_alert(event.category)
}

/// Assemble the alert embed for an event.
///
/// Measurement groups are emitted only when all of their constituent
/// values are present; absent groups are omitted rather than rendered as
/// null.
pub fn event_embed(event: &Event, avatar_url: Option<&str>) -> Embed {
    let mut fields = vec![EmbedField::block("Category", event.category.to_string())];

    if let (Some(x), Some(y), Some(z)) = (event.accel_x, event.accel_y, event.accel_z) {
        fields.push(EmbedField::inline(
            "Acceleration (g)",
            format!("{x:.2}, {y:.2}, {z:.2}"),
        ));
    }
    if let (Some(x), Some(y), Some(z)) = (event.gyro_x, event.gyro_y, event.gyro_z) {
        fields.push(EmbedField::inline(
            "Gyroscope (rad/s)",
            format!("{x:.2}, {y:.2}, {z:.2}"),
        ));
    }
    if let Some(bpm) = event.heart_rate_bpm {
        fields.push(EmbedField::inline("Heart rate", format!("{bpm} BPM")));
    }
    if let Some(spo2) = event.spo2 {
        fields.push(EmbedField::inline("SpO2", format!("{spo2}%")));
    }
    if let (Some(latitude), Some(longitude)) = (event.latitude, event.longitude) {
        // Debug formatting keeps a trailing `.0` on whole-number
        // coordinates, so the link always reads as a lat/lon pair.
        let url = format!("https://www.google.com/maps?q={latitude:?},{longitude:?}");
        fields.push(EmbedField::inline("Location", format!("[Google Maps]({url})")));
    }
    if let Some(altitude) = event.neo6m_altitude_meter {
        fields.push(EmbedField::inline("NEO-6M altitude", format!("{altitude:.2} m")));
    }
    if let Some(pressure) = event.pressure_pa {
        fields.push(EmbedField::inline("Pressure", format!("{pressure:.2} Pa")));
    }
    if let Some(altitude) = event.bmp280_altitude_meter {
        fields.push(EmbedField::inline("BMP280 altitude", format!("{altitude:.2} m")));
    }

    Embed {
        title: Some(event.device.name.clone()),
        timestamp: Some(event.created_at()),
        color: Some(ALERT_COLOR),
        footer: Some(EmbedFooter {
            text: format!("Event ID: {}", event.id),
            icon_url: None,
        }),
        thumbnail: avatar_url.map(|url| EmbedThumbnail {
            url: url.to_string(),
        }),
        fields,
        ..Embed::default()
    }
}

/// Send the alert for a qualifying event to its owner's DM channel.
pub async fn send_event_alert(
    client: &DiscordClient,
    event: &Event,
    avatar_url: Option<&str>,
) -> NotifyResult<()> {
    let embed = event_embed(event, avatar_url);
    client
        .post_message(
            event.device.user.discord_channel_id,
            Some(ALERT_CONTENT),
            &[embed],
        )
        .await
}
