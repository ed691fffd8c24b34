//! Event operations.

use super::rehash::schedule_rehash;
use crate::state::AppState;
use crate::tasks::BackgroundTasks;
use beacon_auth::CredentialHasher;
use beacon_core::event::NewEvent;
use beacon_core::{Device, Envelope, Event, OutcomeCode};
use beacon_metadata::{DeviceRepo, EventRepo};
use beacon_notify::{DiscordClient, dispatch};
use std::sync::Arc;

/// List all events of a device, scoped to its owner.
pub async fn list(state: &AppState, device_id: i64, user_id: i64) -> Envelope<Vec<Event>> {
    let Some(store) = state.database.store().await else {
        return Envelope::failure(OutcomeCode::DatabaseFailure);
    };
    list_with(&store, device_id, user_id).await
}

/// List events against explicit storage.
pub async fn list_with<S: EventRepo>(
    store: &S,
    device_id: i64,
    user_id: i64,
) -> Envelope<Vec<Event>> {
    match store.list_events(device_id, user_id).await {
        Ok(rows) => Envelope::ok(rows.into_iter().map(Into::into).collect()),
        Err(err) => {
            tracing::error!(error = %err, device_id, "event listing failed");
            Envelope::failure(OutcomeCode::DatabaseFailure)
        }
    }
}

/// Authenticate a device and record one of its events.
///
/// On success, a qualifying event is handed to the notification channel
/// as a detached task; the envelope is returned to the caller without
/// waiting for (or being affected by) delivery.
pub async fn create(
    state: &AppState,
    payload: NewEvent,
    device_id: i64,
    device_token: &str,
) -> Envelope<Event> {
    let Some(store) = state.database.store().await else {
        return Envelope::failure(OutcomeCode::DatabaseFailure);
    };

    let envelope = create_with(
        &store,
        &state.hasher,
        &state.tasks,
        payload,
        device_id,
        device_token,
    )
    .await;

    if let Some(event) = envelope.data.as_ref() {
        schedule_alert(
            &state.tasks,
            state.discord.clone(),
            state.bot_avatar_url().await,
            event,
        )
        .await;
    }

    envelope
}

/// Record an event against explicit storage.
///
/// The device must exist and the presented token must verify against its
/// stored form. A verify against a stale stored form schedules a
/// background rehash, exactly as user logins do.
pub async fn create_with<S>(
    store: &S,
    hasher: &Arc<CredentialHasher>,
    tasks: &BackgroundTasks,
    payload: NewEvent,
    device_id: i64,
    device_token: &str,
) -> Envelope<Event>
where
    S: DeviceRepo + EventRepo + Clone + Send + Sync + 'static,
{
    let row = match store.get_device(device_id).await {
        Ok(Some(row)) => row,
        Ok(None) => return Envelope::failure(OutcomeCode::DeviceNotFound),
        Err(err) => {
            tracing::error!(error = %err, device_id, "device lookup failed");
            return Envelope::failure(OutcomeCode::DatabaseFailure);
        }
    };

    let device: Device = row.into();
    if !hasher.verify(&device.hashed_token, device_token) {
        return Envelope::failure(OutcomeCode::IncorrectCredentials);
    }

    let persist_store = store.clone();
    let rehash_device_id = device.id.value();
    schedule_rehash(
        tasks,
        hasher,
        "device-credential-rehash",
        &device.hashed_token,
        device_token,
        move |new_form| async move {
            persist_store
                .update_device_token(rehash_device_id, &new_form)
                .await
        },
    )
    .await;

    match store.create_event(&payload, device_id).await {
        Ok(row) => Envelope::ok(row.into()),
        Err(err) => {
            tracing::error!(error = %err, device_id, "event creation failed");
            Envelope::failure(OutcomeCode::DatabaseFailure)
        }
    }
}

/// Schedule the best-effort alert for a persisted event, if it qualifies.
///
/// Runs strictly after the write has committed (the caller passes the
/// persisted event) and is fully decoupled from the write's outcome:
/// delivery failures are logged inside the task and reach no caller.
pub async fn schedule_alert(
    tasks: &BackgroundTasks,
    discord: Arc<DiscordClient>,
    avatar_url: Option<String>,
    event: &Event,
) {
    if !dispatch::qualifies(event) {
        return;
    }

    let event = event.clone();
    tasks
        .spawn("event-alert", async move {
            if let Err(err) =
                dispatch::send_event_alert(&discord, &event, avatar_url.as_deref()).await
            {
                tracing::error!(error = %err, event_id = %event.id, "event alert delivery failed");
            }
        })
        .await;
}
