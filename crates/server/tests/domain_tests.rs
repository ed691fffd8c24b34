//! Domain operation tests over mock storage and a stub messaging API.

mod common;

use argon2::password_hash::{PasswordHasher as _, SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, Version};
use beacon_auth::CredentialHasher;
use beacon_core::OutcomeCode;
use beacon_core::category::FALL_DETECTED;
use beacon_core::event::NewEvent;
use beacon_metadata::UserRepo;
use beacon_notify::DiscordClient;
use beacon_server::domain::{devices, events, users};
use beacon_server::tasks::BackgroundTasks;
use common::discord::{self, REJECTED_RECIPIENT, STUB_CHANNEL_ID};
use common::mocks::MockStore;
use std::sync::Arc;
use std::time::Duration;

const DRAIN: Duration = Duration::from_secs(5);

fn hasher() -> Arc<CredentialHasher> {
    Arc::new(CredentialHasher::new())
}

/// A stored form produced with weaker-than-target parameters, so
/// `needs_rehash` reports true for it.
fn weak_hash(secret: &str) -> String {
    let params = Params::new(Params::MIN_M_COST, 2, 1, None).unwrap();
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(secret.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

fn full_payload(category: i32) -> NewEvent {
    NewEvent {
        category,
        accel_x: Some(0.1),
        accel_y: Some(0.2),
        accel_z: Some(9.8),
        gyro_x: Some(0.0),
        gyro_y: Some(0.0),
        gyro_z: Some(0.0),
        heart_rate_bpm: Some(72),
        spo2: Some(98),
        latitude: Some(1.0),
        longitude: Some(2.0),
        neo6m_altitude_meter: None,
        pressure_pa: None,
        bmp280_altitude_meter: None,
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_returns_the_user() {
    let store = MockStore::new();
    let hasher = hasher();
    let tasks = BackgroundTasks::new();

    let stored = hasher.hash("hunter2").unwrap();
    store.add_user("ada", 100, &stored);

    let envelope = users::login_with(&store, &hasher, &tasks, "ada", "hunter2").await;
    assert_eq!(envelope.code, OutcomeCode::Success);
    assert_eq!(envelope.data.unwrap().username, "ada");
}

#[tokio::test]
async fn login_rejects_unknown_user() {
    let store = MockStore::new();
    let envelope = users::login_with(&store, &hasher(), &BackgroundTasks::new(), "ghost", "pw").await;
    assert_eq!(envelope.code, OutcomeCode::IncorrectCredentials);
    assert!(envelope.data.is_none());
}

#[tokio::test]
async fn login_rejects_wrong_password() {
    let store = MockStore::new();
    let hasher = hasher();
    let tasks = BackgroundTasks::new();

    let stored = hasher.hash("hunter2").unwrap();
    store.add_user("ada", 100, &stored);

    let envelope = users::login_with(&store, &hasher, &tasks, "ada", "wrong").await;
    assert_eq!(envelope.code, OutcomeCode::IncorrectCredentials);

    tasks.shutdown(DRAIN).await;
    assert!(store.password_updates().is_empty());
}

#[tokio::test]
async fn login_with_current_hash_schedules_no_rehash() {
    let store = MockStore::new();
    let hasher = hasher();
    let tasks = BackgroundTasks::new();

    let stored = hasher.hash("hunter2").unwrap();
    store.add_user("ada", 100, &stored);

    users::login_with(&store, &hasher, &tasks, "ada", "hunter2").await;
    tasks.shutdown(DRAIN).await;

    assert!(store.password_updates().is_empty());
}

#[tokio::test]
async fn login_with_stale_hash_schedules_exactly_one_rehash() {
    let store = MockStore::new();
    let hasher = hasher();
    let tasks = BackgroundTasks::new();

    let user_id = store.add_user("ada", 100, &weak_hash("hunter2"));

    let envelope = users::login_with(&store, &hasher, &tasks, "ada", "hunter2").await;
    assert_eq!(envelope.code, OutcomeCode::Success);

    tasks.shutdown(DRAIN).await;

    let updates = store.password_updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, user_id);

    // The new stored form verifies and is current.
    let stored = store.stored_password(user_id).unwrap();
    assert!(hasher.verify(&stored, "hunter2"));
    assert!(!hasher.needs_rehash(&stored));
}

#[tokio::test]
async fn login_during_pending_rehash_still_succeeds() {
    let store = MockStore::new();
    let hasher = hasher();
    let tasks = BackgroundTasks::new();

    store.add_user("ada", 100, &weak_hash("hunter2"));

    // Two logins back to back; the second races the first one's rehash
    // task and must succeed against whichever stored form it observes.
    let first = users::login_with(&store, &hasher, &tasks, "ada", "hunter2").await;
    let second = users::login_with(&store, &hasher, &tasks, "ada", "hunter2").await;
    assert_eq!(first.code, OutcomeCode::Success);
    assert_eq!(second.code, OutcomeCode::Success);

    tasks.shutdown(DRAIN).await;

    let user_id = first.data.unwrap().id.value();
    let stored = store.stored_password(user_id).unwrap();
    assert!(hasher.verify(&stored, "hunter2"));
    assert!(!hasher.needs_rehash(&stored));
}

#[tokio::test]
async fn create_user_records_the_dm_channel() {
    let store = MockStore::new();
    let hasher = hasher();
    let stub = discord::spawn().await;
    let client = DiscordClient::new("test-token").with_base_url(stub.base_url.clone());

    let envelope = users::create_with(&store, &hasher, &client, "ada", 42, "hunter2").await;
    assert_eq!(envelope.code, OutcomeCode::Success);

    let user = envelope.data.unwrap();
    assert_eq!(user.discord_channel_id, STUB_CHANNEL_ID);
    assert!(hasher.verify(&user.hashed_password, "hunter2"));
}

#[tokio::test]
async fn create_user_maps_conflict_to_duplicate_username() {
    let store = MockStore::new();
    let hasher = hasher();
    let stub = discord::spawn().await;
    let client = DiscordClient::new("test-token").with_base_url(stub.base_url.clone());

    let first = users::create_with(&store, &hasher, &client, "ada", 42, "pw1").await;
    assert_eq!(first.code, OutcomeCode::Success);

    let second = users::create_with(&store, &hasher, &client, "ada", 43, "pw2").await;
    assert_eq!(second.code, OutcomeCode::DuplicateUsername);
    assert!(second.data.is_none());
}

#[tokio::test]
async fn create_user_with_rejected_recipient_creates_nothing() {
    let store = MockStore::new();
    let hasher = hasher();
    let stub = discord::spawn().await;
    let client = DiscordClient::new("test-token").with_base_url(stub.base_url.clone());

    let envelope =
        users::create_with(&store, &hasher, &client, "ada", REJECTED_RECIPIENT, "pw").await;
    assert_eq!(envelope.code, OutcomeCode::InvalidDiscordUserId);
    assert!(store.get_user_by_username("ada").await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Devices
// ---------------------------------------------------------------------------

#[tokio::test]
async fn device_create_get_and_list() {
    let store = MockStore::new();
    let hasher = hasher();

    let user_id = store.add_user("ada", 100, &hasher.hash("pw").unwrap());

    let created = devices::create_with(&store, &hasher, "wrist-unit", "devtoken", user_id).await;
    assert_eq!(created.code, OutcomeCode::Success);
    let device = created.data.unwrap();
    assert_eq!(device.name, "wrist-unit");
    assert!(hasher.verify(&device.hashed_token, "devtoken"));

    let fetched = devices::get_with(&store, device.id.value()).await;
    assert_eq!(fetched.code, OutcomeCode::Success);

    let listed = devices::list_with(&store, user_id).await;
    assert_eq!(listed.code, OutcomeCode::Success);
    assert_eq!(listed.data.unwrap().len(), 1);

    // Someone else's listing is empty.
    let other = devices::list_with(&store, user_id + 1).await;
    assert!(other.data.unwrap().is_empty());
}

#[tokio::test]
async fn device_get_unknown_is_not_found() {
    let store = MockStore::new();
    let envelope = devices::get_with(&store, 999).await;
    assert_eq!(envelope.code, OutcomeCode::DeviceNotFound);
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn event_create_for_unknown_device_is_not_found() {
    let store = MockStore::new();
    let envelope = events::create_with(
        &store,
        &hasher(),
        &BackgroundTasks::new(),
        full_payload(FALL_DETECTED),
        999,
        "token",
    )
    .await;
    assert_eq!(envelope.code, OutcomeCode::DeviceNotFound);
}

#[tokio::test]
async fn event_create_rejects_bad_device_token() {
    let store = MockStore::new();
    let hasher = hasher();
    let tasks = BackgroundTasks::new();

    let user_id = store.add_user("ada", 100, &hasher.hash("pw").unwrap());
    let device_id = store.add_device("wrist-unit", &hasher.hash("devtoken").unwrap(), user_id);

    let envelope = events::create_with(
        &store,
        &hasher,
        &tasks,
        full_payload(FALL_DETECTED),
        device_id,
        "wrong-token",
    )
    .await;
    assert_eq!(envelope.code, OutcomeCode::IncorrectCredentials);
    assert_eq!(store.event_count(), 0);
}

#[tokio::test]
async fn event_create_persists_the_payload() {
    let store = MockStore::new();
    let hasher = hasher();
    let tasks = BackgroundTasks::new();

    let user_id = store.add_user("ada", 100, &hasher.hash("pw").unwrap());
    let device_id = store.add_device("wrist-unit", &hasher.hash("devtoken").unwrap(), user_id);

    let envelope = events::create_with(
        &store,
        &hasher,
        &tasks,
        full_payload(FALL_DETECTED),
        device_id,
        "devtoken",
    )
    .await;
    assert_eq!(envelope.code, OutcomeCode::Success);

    let event = envelope.data.unwrap();
    assert_eq!(event.category, FALL_DETECTED);
    assert_eq!(event.heart_rate_bpm, Some(72));
    assert_eq!(event.device.id.value(), device_id);
    assert_eq!(event.device.user.username, "ada");

    let listed = events::list_with(&store, device_id, user_id).await;
    assert_eq!(listed.data.unwrap().len(), 1);
}

#[tokio::test]
async fn event_create_with_stale_token_schedules_exactly_one_rehash() {
    let store = MockStore::new();
    let hasher = hasher();
    let tasks = BackgroundTasks::new();

    let user_id = store.add_user("ada", 100, &hasher.hash("pw").unwrap());
    let device_id = store.add_device("wrist-unit", &weak_hash("devtoken"), user_id);

    let envelope = events::create_with(
        &store,
        &hasher,
        &tasks,
        full_payload(FALL_DETECTED),
        device_id,
        "devtoken",
    )
    .await;
    assert_eq!(envelope.code, OutcomeCode::Success);

    tasks.shutdown(DRAIN).await;

    let updates = store.token_updates();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].0, device_id);

    let stored = store.stored_token(device_id).unwrap();
    assert!(hasher.verify(&stored, "devtoken"));
    assert!(!hasher.needs_rehash(&stored));

    // The device still authenticates with the same plaintext token.
    let again = events::create_with(
        &store,
        &hasher,
        &tasks,
        full_payload(FALL_DETECTED),
        device_id,
        "devtoken",
    )
    .await;
    assert_eq!(again.code, OutcomeCode::Success);
}

// ---------------------------------------------------------------------------
// Notification fan-out
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fall_event_alert_reaches_the_owner_channel() {
    let store = MockStore::new();
    let hasher = hasher();
    let tasks = BackgroundTasks::new();
    let stub = discord::spawn().await;
    let client = DiscordClient::new("test-token").with_base_url(stub.base_url.clone());

    let user_id = store.add_user("ada", 555, &hasher.hash("pw").unwrap());
    let device_id = store.add_device("wrist-unit", &hasher.hash("devtoken").unwrap(), user_id);

    let envelope = events::create_with(
        &store,
        &hasher,
        &tasks,
        full_payload(FALL_DETECTED),
        device_id,
        "devtoken",
    )
    .await;
    let event = envelope.data.unwrap();

    events::schedule_alert(
        &tasks,
        Arc::new(client),
        Some("https://cdn.example/avatar.png".to_string()),
        &event,
    )
    .await;
    tasks.shutdown(DRAIN).await;

    let messages = stub.messages();
    assert_eq!(messages.len(), 1);

    let (channel_id, body) = &messages[0];
    assert_eq!(*channel_id, 555);
    assert_eq!(body["content"], "A new sensor event has been detected.");

    let embed = &body["embeds"][0];
    assert_eq!(embed["title"], "wrist-unit");
    assert_eq!(embed["thumbnail"]["url"], "https://cdn.example/avatar.png");

    let names: Vec<&str> = embed["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|field| field["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Acceleration (g)"));
    assert!(names.contains(&"Gyroscope (rad/s)"));
    assert!(names.contains(&"Heart rate"));
    assert!(names.contains(&"SpO2"));
    assert!(names.contains(&"Location"));

    let location = embed["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|field| field["name"] == "Location")
        .unwrap();
    assert!(
        location["value"]
            .as_str()
            .unwrap()
            .contains("https://www.google.com/maps?q=1.0,2.0")
    );
}

#[tokio::test]
async fn measurement_free_alert_carries_only_the_category_field() {
    let store = MockStore::new();
    let hasher = hasher();
    let tasks = BackgroundTasks::new();
    let stub = discord::spawn().await;
    let client = DiscordClient::new("test-token").with_base_url(stub.base_url.clone());

    let user_id = store.add_user("ada", 555, &hasher.hash("pw").unwrap());
    let device_id = store.add_device("wrist-unit", &hasher.hash("devtoken").unwrap(), user_id);

    let envelope = events::create_with(
        &store,
        &hasher,
        &tasks,
        NewEvent {
            category: FALL_DETECTED,
            ..NewEvent::default()
        },
        device_id,
        "devtoken",
    )
    .await;
    let event = envelope.data.unwrap();

    events::schedule_alert(&tasks, Arc::new(client), None, &event).await;
    tasks.shutdown(DRAIN).await;

    let messages = stub.messages();
    assert_eq!(messages.len(), 1);

    let embed = &messages[0].1["embeds"][0];
    let names: Vec<&str> = embed["fields"]
        .as_array()
        .unwrap()
        .iter()
        .map(|field| field["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Category"]);
    assert!(embed.get("thumbnail").is_none());
}

#[tokio::test]
async fn non_fall_events_are_not_dispatched() {
    let store = MockStore::new();
    let hasher = hasher();
    let tasks = BackgroundTasks::new();
    let stub = discord::spawn().await;
    let client = DiscordClient::new("test-token").with_base_url(stub.base_url.clone());

    let user_id = store.add_user("ada", 555, &hasher.hash("pw").unwrap());
    let device_id = store.add_device("wrist-unit", &hasher.hash("devtoken").unwrap(), user_id);

    let envelope = events::create_with(
        &store,
        &hasher,
        &tasks,
        full_payload(0),
        device_id,
        "devtoken",
    )
    .await;
    let event = envelope.data.unwrap();

    events::schedule_alert(&tasks, Arc::new(client), None, &event).await;
    tasks.shutdown(DRAIN).await;

    assert!(stub.messages().is_empty());
}
