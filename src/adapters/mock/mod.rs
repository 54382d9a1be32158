//! Mock implementations for testing.
//!
//! - [`InMemoryStore`] - key-value persistence with failure switches
//! - [`MockDashboardApi`] - scripted, optionally delayed API replies

pub mod api;
pub mod memory_store;

pub use api::{Endpoint, MockDashboardApi, MockReply, RecordedCall};
pub use memory_store::{InMemoryStore, StoreOp};
