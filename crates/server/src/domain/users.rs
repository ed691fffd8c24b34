//! User operations.

use super::rehash::schedule_rehash;
use crate::state::AppState;
use crate::tasks::BackgroundTasks;
use beacon_auth::CredentialHasher;
use beacon_core::{Envelope, OutcomeCode, User};
use beacon_metadata::{MetadataError, UserRepo};
use beacon_notify::DiscordClient;
use std::sync::Arc;

/// Look up a user by identifier.
pub async fn get(state: &AppState, id: i64) -> Envelope<User> {
    let Some(store) = state.database.store().await else {
        return Envelope::failure(OutcomeCode::DatabaseFailure);
    };
    get_with(&store, id).await
}

/// Look up a user against explicit storage.
pub async fn get_with<S: UserRepo>(store: &S, id: i64) -> Envelope<User> {
    match store.get_user(id).await {
        Ok(Some(row)) => Envelope::ok(row.into()),
        Ok(None) => Envelope::failure(OutcomeCode::UserNotFound),
        Err(err) => {
            tracing::error!(error = %err, user_id = id, "user lookup failed");
            Envelope::failure(OutcomeCode::DatabaseFailure)
        }
    }
}

/// Authenticate a user by username and password.
///
/// A missing user and a wrong password are indistinguishable to the
/// caller. A successful verify against a stale stored form schedules a
/// background rehash that does not block this call.
pub async fn login(state: &AppState, username: &str, password: &str) -> Envelope<User> {
    let Some(store) = state.database.store().await else {
        return Envelope::failure(OutcomeCode::DatabaseFailure);
    };
    login_with(&store, &state.hasher, &state.tasks, username, password).await
}

/// Authenticate against explicit storage.
pub async fn login_with<S>(
    store: &S,
    hasher: &Arc<CredentialHasher>,
    tasks: &BackgroundTasks,
    username: &str,
    password: &str,
) -> Envelope<User>
where
    S: UserRepo + Clone + Send + Sync + 'static,
{
    let row = match store.get_user_by_username(username).await {
        Ok(Some(row)) => row,
        Ok(None) => return Envelope::failure(OutcomeCode::IncorrectCredentials),
        Err(err) => {
            tracing::error!(error = %err, "user login lookup failed");
            return Envelope::failure(OutcomeCode::DatabaseFailure);
        }
    };

    let user: User = row.into();
    if !hasher.verify(&user.hashed_password, password) {
        return Envelope::failure(OutcomeCode::IncorrectCredentials);
    }

    let persist_store = store.clone();
    let user_id = user.id.value();
    schedule_rehash(
        tasks,
        hasher,
        "user-credential-rehash",
        &user.hashed_password,
        password,
        move |new_form| async move {
            persist_store.update_user_password(user_id, &new_form).await
        },
    )
    .await;

    Envelope::ok(user)
}

/// Register a user.
///
/// The recipient DM channel is created before the row is inserted, so a
/// bad external user ID never leaves a half-registered user behind.
pub async fn create(
    state: &AppState,
    username: &str,
    discord_user_id: i64,
    password: &str,
) -> Envelope<User> {
    let Some(store) = state.database.store().await else {
        return Envelope::failure(OutcomeCode::DatabaseFailure);
    };
    create_with(
        &store,
        &state.hasher,
        &state.discord,
        username,
        discord_user_id,
        password,
    )
    .await
}

/// Register a user against explicit storage and messaging collaborators.
pub async fn create_with<S: UserRepo>(
    store: &S,
    hasher: &CredentialHasher,
    discord: &DiscordClient,
    username: &str,
    discord_user_id: i64,
    password: &str,
) -> Envelope<User> {
    let hashed = match hasher.hash(password) {
        Ok(hashed) => hashed,
        Err(err) => {
            tracing::error!(error = %err, "password hashing failed");
            return Envelope::failure(OutcomeCode::DatabaseFailure);
        }
    };

    let channel_id = match discord.create_dm_channel(discord_user_id).await {
        Ok(channel_id) => channel_id,
        Err(err) => {
            tracing::warn!(error = %err, "DM channel creation failed");
            return Envelope::failure(OutcomeCode::InvalidDiscordUserId);
        }
    };

    match store.create_user(username, channel_id, &hashed).await {
        Ok(row) => Envelope::ok(row.into()),
        Err(MetadataError::Conflict(_)) => Envelope::failure(OutcomeCode::DuplicateUsername),
        Err(err) => {
            tracing::error!(error = %err, "user creation failed");
            Envelope::failure(OutcomeCode::DatabaseFailure)
        }
    }
}
