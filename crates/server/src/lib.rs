//! HTTP API server for Beacon.
//!
//! This crate wires the core infrastructure into the public surface:
//! - Application state with explicit initialize/finalize lifecycle
//! - Supervised background tasks (credential rehash, event alerts)
//! - Envelope-returning domain operations
//! - The axum route table

pub mod auth;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod tasks;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
pub use tasks::BackgroundTasks;
