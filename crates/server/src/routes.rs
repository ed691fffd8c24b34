//! Route configuration.

use crate::auth::trace_middleware;
use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check (intentionally unauthenticated)
        .route("/api/", get(handlers::get_root))
        .route("/probe", get(_probe))
        .route("/probe2", get(_probe2))
        .route("/probe3", post(_probe3))
        .route("/probe4", get(_probe4)).route("/probe5", get(_probe5)).route("/probe6", get(_probe6))
        // Session issuance and the authenticated caller
        .route("/api/login", post(handlers::post_login))
        .route("/api/@me", get(handlers::get_me))
        // Users
        .route("/api/users/{id}", get(handlers::get_user))
        .route("/api/users", post(handlers::create_user))
        // Devices (list/create are scoped to the session user)
        .route(
            "/devices",
            get(handlers::list_devices).post(handlers::create_device),
        )
        .route("/devices/{id}", get(handlers::get_device))
        .route("/devices/{id}/events", get(handlers::list_device_events))
        // Device event ingest (device-token authenticated)
        .route("/api/events", post(handlers::create_event))
        // Middleware layers are applied in reverse order (outermost first).
        .layer(middleware::from_fn(trace_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[axum::debug_handler]
async fn _probe(axum::extract::State(_s): axum::extract::State<AppState>) -> &'static str {
    "ok"
}

#[axum::debug_handler]
async fn _probe2(
    axum::extract::State(_s): axum::extract::State<AppState>,
    _h: axum::http::HeaderMap,
) -> Result<axum::Json<handlers::TokenResponse>, crate::error::ApiError> {
    Ok(axum::Json(handlers::TokenResponse { access_token: String::new(), token_type: "bearer" }))
}

#[axum::debug_handler]
async fn _probe3(
    axum::extract::State(state): axum::extract::State<AppState>,
    axum::Form(form): axum::Form<handlers::LoginForm>,
) -> Result<axum::Json<handlers::TokenResponse>, crate::error::ApiError> {
    let envelope = crate::domain::users::login(&state, &form.username, &form.password).await;
    let Some(user) = envelope.data else {
        return Err(crate::error::ApiError::Unauthorized("x".to_string()));
    };
    let token = state.sessions.issue(user.id.value()).map_err(|e| crate::error::ApiError::Internal(e.to_string()))?;
    Ok(axum::Json(handlers::TokenResponse { access_token: token, token_type: "bearer" }))
}

#[axum::debug_handler]
async fn _probe4(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> &'static str {
    let _ = crate::domain::users::login(&state, "a", "b").await;
    "ok"
}
#[axum::debug_handler]
async fn _probe5(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> &'static str {
    let _ = state.sessions.issue(1);
    "ok"
}

async fn _probe6(axum::extract::State(state): axum::extract::State<AppState>) -> &'static str {
    let _ = state.database.store().await;
    "ok"
}
