//! Request tracing and bearer-token authentication.

use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::Request;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use beacon_core::User;
use tracing::Instrument;
use uuid::Uuid;

/// Middleware that runs every request inside a span carrying a
/// correlation ID, so log lines of one request can be tied together.
pub async fn trace_middleware(req: Request, next: Next) -> Response {
    let trace_id = Uuid::new_v4();
    next.run(req)
        .instrument(tracing::info_span!("request", trace_id = %trace_id))
        .await
}

/// Extract the bearer token from the Authorization header.
/// Per RFC 6750, the "Bearer" scheme is case-insensitive.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| {
            if value.len() >= 7 && value[..7].eq_ignore_ascii_case("bearer ") {
                Some(&value[7..])
            } else {
                None
            }
        })
}

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid credentials".to_string())
}

/// Resolve the authenticated user behind a request.
///
/// The session token must be present, validly signed, unexpired, and its
/// subject must be the decimal identifier of an existing user. Every
/// failure mode collapses to 401.
pub async fn current_user(state: &AppState, headers: &HeaderMap) -> Result<User, ApiError> {
    let token = bearer_token(headers).ok_or_else(invalid_credentials)?;
    let subject = state
        .sessions
        .validate(token)
        .ok_or_else(invalid_credentials)?;

    if subject.is_empty() || !subject.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_credentials());
    }
    let user_id: i64 = subject.parse().map_err(|_| invalid_credentials())?;

    let user = crate::domain::users::get(state, user_id).await;
    user.data.ok_or_else(invalid_credentials)
}
