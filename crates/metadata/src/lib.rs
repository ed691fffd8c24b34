//! Storage layer for Beacon.
//!
//! This crate owns everything between the domain operations and
//! PostgreSQL:
//! - The lazily-initialized, lock-guarded connection pool with schema
//!   bootstrap and degraded-state fallback
//! - Row models for the read views
//! - Repository traits and their PostgreSQL implementation

pub mod connector;
pub mod error;
pub mod models;
pub mod postgres;
pub mod repos;

pub use connector::DatabaseConnector;
pub use error::{MetadataError, MetadataResult};
pub use postgres::PostgresStore;
pub use repos::{DeviceRepo, EventRepo, UserRepo};
