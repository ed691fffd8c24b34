//! Event ingest endpoint.

use crate::domain;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use beacon_core::event::NewEvent;
use beacon_core::{Envelope, Event};
use serde::Deserialize;

/// Event upload body: the sensor payload plus the device's own
/// credentials. Devices authenticate per request; they hold no session.
#[derive(Debug, Deserialize)]
pub struct CreateEventBody {
    #[serde(flatten)]
    pub payload: NewEvent,
    pub device_id: i64,
    pub device_token: String,
}

/// POST /api/events - Upload a new event from a device.
pub async fn create_event(
    State(state): State<AppState>,
    Json(body): Json<CreateEventBody>,
) -> Json<Envelope<Event>> {
    Json(domain::events::create(&state, body.payload, body.device_id, &body.device_token).await)
}
