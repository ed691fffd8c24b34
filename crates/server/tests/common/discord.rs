//! Stub messaging API server for integration tests.
//!
//! Speaks just enough of the Discord API for the flows under test:
//! bot profile lookup, DM channel creation (rejecting recipient `0`),
//! and message posting with capture of every posted body.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

/// Recipient ID the stub rejects, for invalid-recipient tests.
pub const REJECTED_RECIPIENT: i64 = 0;

/// Channel ID the stub hands out for every DM channel.
pub const STUB_CHANNEL_ID: i64 = 7700;

#[derive(Clone, Default)]
struct Captured {
    messages: Arc<Mutex<Vec<(i64, Value)>>>,
}

/// Handle to a running stub server.
pub struct StubDiscord {
    /// Base URL to point a `DiscordClient` at.
    pub base_url: String,
    captured: Captured,
}

impl StubDiscord {
    /// All message bodies posted so far, with their channel IDs.
    pub fn messages(&self) -> Vec<(i64, Value)> {
        self.captured.messages.lock().unwrap().clone()
    }
}

/// Start the stub on an ephemeral port.
pub async fn spawn() -> StubDiscord {
    let captured = Captured::default();

    let app = Router::new()
        .route("/users/@me", get(current_user))
        .route("/users/@me/channels", post(create_dm_channel))
        .route("/channels/{channel_id}/messages", post(post_message))
        .with_state(captured.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    StubDiscord {
        base_url: format!("http://{addr}"),
        captured,
    }
}

async fn current_user() -> Json<Value> {
    Json(json!({ "id": "424242", "avatar": "aabbcc" }))
}

async fn create_dm_channel(Json(body): Json<Value>) -> Response {
    let recipient = body["recipient_id"].as_str().unwrap_or_default();
    if recipient == REJECTED_RECIPIENT.to_string() {
        return StatusCode::BAD_REQUEST.into_response();
    }
    Json(json!({ "id": STUB_CHANNEL_ID.to_string() })).into_response()
}

async fn post_message(
    State(captured): State<Captured>,
    Path(channel_id): Path<i64>,
    Json(body): Json<Value>,
) -> Json<Value> {
    captured.messages.lock().unwrap().push((channel_id, body));
    Json(json!({ "id": "1" }))
}
