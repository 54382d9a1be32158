//! Request lifecycle tracking for remote calls.
//!
//! - [`QueryHook`]: `{data, loading, error, refetch}` around a producer
//! - [`MutationHook`]: `{invoke, loading, error}` around a one-shot action
//!
//! Both hold an [`AppStore`](crate::state::AppStore) handle and only ever
//! call its notification actions.

pub mod mutation;
pub mod query;

pub use mutation::{MutationHook, MutationState};
pub use query::{ErrorCallback, QueryHook, QueryOptions, RequestState, SuccessCallback};

/// Error text used when a failure carries no message of its own.
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";
