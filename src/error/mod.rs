//! Error types for the dashboard state layer.
//!
//! - [`ApiError`] - classification of failed remote calls, carrying the
//!   user-facing message that hooks surface in their `error` field
//! - [`PersistenceError`] - failures of the key-value persistence surface
//!
//! Hooks never classify failures themselves: a producer returns whatever
//! error it likes and the hook keeps its `Display` text. `ApiError` exists so
//! transports (and test doubles) share one taxonomy.

mod api;
mod persistence;

pub use api::ApiError;
pub use persistence::{PersistenceError, PersistenceResult};
