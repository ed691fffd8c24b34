//! Device endpoints.

use crate::auth::current_user;
use crate::domain;
use crate::error::ApiResult;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;
use beacon_core::{Device, Envelope, Event};
use serde::Deserialize;

/// GET /devices - List all devices of the current user.
pub async fn list_devices(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Envelope<Vec<Device>>>> {
    let user = current_user(&state, &headers).await?;
    Ok(Json(domain::devices::list(&state, user.id.value()).await))
}

/// GET /devices/{id} - Query a device by ID.
pub async fn get_device(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Json<Envelope<Device>> {
    Json(domain::devices::get(&state, id).await)
}

/// Device registration body.
#[derive(Debug, Deserialize)]
pub struct CreateDeviceBody {
    pub name: String,
    pub token: String,
}

/// POST /devices - Create a new device for the current user.
pub async fn create_device(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateDeviceBody>,
) -> ApiResult<Json<Envelope<Device>>> {
    let user = current_user(&state, &headers).await?;
    Ok(Json(
        domain::devices::create(&state, &body.name, &body.token, user.id.value()).await,
    ))
}

/// GET /devices/{id}/events - List all events for a device of the current
/// user.
pub async fn list_device_events(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> ApiResult<Json<Envelope<Vec<Event>>>> {
    let user = current_user(&state, &headers).await?;
    Ok(Json(domain::events::list(&state, id, user.id.value()).await))
}
