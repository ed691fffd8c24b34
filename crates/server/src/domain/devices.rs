//! Device operations.

use crate::state::AppState;
use beacon_auth::CredentialHasher;
use beacon_core::{Device, Envelope, OutcomeCode};
use beacon_metadata::DeviceRepo;

/// Look up a device by identifier.
pub async fn get(state: &AppState, id: i64) -> Envelope<Device> {
    let Some(store) = state.database.store().await else {
        return Envelope::failure(OutcomeCode::DatabaseFailure);
    };
    get_with(&store, id).await
}

/// Look up a device against explicit storage.
pub async fn get_with<S: DeviceRepo>(store: &S, id: i64) -> Envelope<Device> {
    match store.get_device(id).await {
        Ok(Some(row)) => Envelope::ok(row.into()),
        Ok(None) => Envelope::failure(OutcomeCode::DeviceNotFound),
        Err(err) => {
            tracing::error!(error = %err, device_id = id, "device lookup failed");
            Envelope::failure(OutcomeCode::DatabaseFailure)
        }
    }
}

/// List all devices owned by a user.
pub async fn list(state: &AppState, user_id: i64) -> Envelope<Vec<Device>> {
    let Some(store) = state.database.store().await else {
        return Envelope::failure(OutcomeCode::DatabaseFailure);
    };
    list_with(&store, user_id).await
}

/// List devices against explicit storage.
pub async fn list_with<S: DeviceRepo>(store: &S, user_id: i64) -> Envelope<Vec<Device>> {
    match store.list_devices(user_id).await {
        Ok(rows) => Envelope::ok(rows.into_iter().map(Into::into).collect()),
        Err(err) => {
            tracing::error!(error = %err, user_id, "device listing failed");
            Envelope::failure(OutcomeCode::DatabaseFailure)
        }
    }
}

/// Register a device for a user. The provisioning token is hashed before
/// anything touches storage; the plaintext is never persisted.
pub async fn create(state: &AppState, name: &str, token: &str, user_id: i64) -> Envelope<Device> {
    let Some(store) = state.database.store().await else {
        return Envelope::failure(OutcomeCode::DatabaseFailure);
    };
    create_with(&store, &state.hasher, name, token, user_id).await
}

/// Register a device against explicit storage.
pub async fn create_with<S: DeviceRepo>(
    store: &S,
    hasher: &CredentialHasher,
    name: &str,
    token: &str,
    user_id: i64,
) -> Envelope<Device> {
    let hashed = match hasher.hash(token) {
        Ok(hashed) => hashed,
        Err(err) => {
            tracing::error!(error = %err, "device token hashing failed");
            return Envelope::failure(OutcomeCode::DatabaseFailure);
        }
    };

    match store.create_device(name, &hashed, user_id).await {
        Ok(row) => Envelope::ok(row.into()),
        Err(err) => {
            tracing::error!(error = %err, user_id, "device creation failed");
            Envelope::failure(OutcomeCode::DatabaseFailure)
        }
    }
}
