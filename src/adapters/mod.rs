//! Concrete implementations of trait abstractions.
//!
//! - [`FileKeyValueStore`] - file-per-key persistence under `~/.velocollab`
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::InMemoryStore`] - in-memory persistence with failure switches
//! - [`mock::MockDashboardApi`] - scripted API replies

pub mod file_store;
pub mod mock;

pub use file_store::FileKeyValueStore;
pub use mock::{InMemoryStore, MockDashboardApi};
