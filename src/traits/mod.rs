//! Trait abstractions for dependency injection and testability.
//!
//! - [`KeyValueStore`] - durable string-keyed persistence
//! - [`DashboardApi`] - remote dashboard API transport

pub mod api;
pub mod persistence;

pub use api::DashboardApi;
pub use persistence::KeyValueStore;
