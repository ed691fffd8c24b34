//! Envelope-returning domain operations.
//!
//! Each operation acquires the shared pool (treating an absent pool as a
//! DATABASE_FAILURE outcome), performs its storage and credential work,
//! and returns an [`beacon_core::Envelope`]. Expected failures never
//! cross these boundaries as `Err`; unexpected query faults are logged
//! and downgraded to DATABASE_FAILURE.
//!
//! The `*_with` variants take the repositories explicitly so tests can
//! substitute mock storage.

pub mod devices;
pub mod events;
pub mod users;

mod rehash;
