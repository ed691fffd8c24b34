//! Health, login, and current-user endpoints.

use crate::auth::current_user;
use crate::domain;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::{Form, Json};
use beacon_core::{Envelope, User};
use serde::{Deserialize, Serialize};

/// GET /api/ - Health check.
pub async fn get_root() -> Json<Envelope<()>> {
    Json(Envelope::empty())
}

/// Login form body (OAuth2 password flow shape).
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Issued session token response.
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

#[axum::debug_handler]
/// POST /api/login - Authenticate a user and issue a session token.
pub async fn post_login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> ApiResult<Json<TokenResponse>> {
    let envelope = domain::users::login(&state, &form.username, &form.password).await;
    let Some(user) = envelope.data else {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    };

    let token = state
        .sessions
        .issue(user.id.value())
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    Ok(Json(TokenResponse {
        access_token: token,
        token_type: "bearer",
    }))
}

/// GET /api/@me - The authenticated user behind the session token.
pub async fn get_me(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<Envelope<User>>> {
    let user = current_user(&state, &headers).await?;
    Ok(Json(Envelope::ok(user)))
}
