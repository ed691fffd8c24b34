//! User endpoints.

use crate::domain;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, State};
use beacon_core::{Envelope, OutcomeCode, User};
use serde::Deserialize;

/// GET /api/users/{id} - Query a user by ID.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Json<Envelope<User>> {
    Json(domain::users::get(&state, id).await)
}

/// Registration body. The external user ID arrives as a decimal string,
/// the way the messaging platform renders identifiers to end users.
#[derive(Debug, Deserialize)]
pub struct CreateUserBody {
    pub username: String,
    pub discord_user_id: String,
    pub password: String,
}

/// POST /api/users - Create a new user.
pub async fn create_user(
    State(state): State<AppState>,
    Json(body): Json<CreateUserBody>,
) -> Json<Envelope<User>> {
    let Ok(discord_user_id) = body.discord_user_id.parse::<i64>() else {
        return Json(Envelope::failure(OutcomeCode::InvalidDiscordUserId));
    };

    Json(domain::users::create(&state, &body.username, discord_user_id, &body.password).await)
}
