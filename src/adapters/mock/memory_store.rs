//! In-memory key-value store for testing.
//!
//! Provides a [`KeyValueStore`] backed by a shared map, with switches that
//! make individual operations fail so tests can exercise the store's
//! fallback paths without touching the file system.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::{PersistenceError, PersistenceResult};
use crate::traits::KeyValueStore;
use crate::util::lock;

/// A recorded persistence operation for verification in tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    Read(String),
    Write(String, String),
    Erase(String),
}

/// In-memory key-value store for testing.
///
/// Clones share the same map, so a test can keep one handle while the
/// application store owns another.
///
/// # Example
///
/// ```ignore
/// use velocollab::adapters::mock::InMemoryStore;
/// use velocollab::traits::KeyValueStore;
///
/// let store = InMemoryStore::new().with_entry("velocollab-theme", "dark");
/// assert_eq!(store.read("velocollab-theme")?.as_deref(), Some("dark"));
///
/// store.set_read_should_fail(true);
/// assert!(store.read("velocollab-theme").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    /// Stored entries
    entries: Arc<Mutex<HashMap<String, String>>>,
    /// Every operation in call order
    ops: Arc<Mutex<Vec<StoreOp>>>,
    /// Whether read should fail
    read_should_fail: Arc<Mutex<bool>>,
    /// Whether write should fail
    write_should_fail: Arc<Mutex<bool>>,
    /// Whether erase should fail
    erase_should_fail: Arc<Mutex<bool>>,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry.
    pub fn with_entry(self, key: &str, value: &str) -> Self {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        self
    }

    /// Configure whether read should fail.
    pub fn set_read_should_fail(&self, should_fail: bool) {
        *lock(&self.read_should_fail) = should_fail;
    }

    /// Configure whether write should fail.
    pub fn set_write_should_fail(&self, should_fail: bool) {
        *lock(&self.write_should_fail) = should_fail;
    }

    /// Configure whether erase should fail.
    pub fn set_erase_should_fail(&self, should_fail: bool) {
        *lock(&self.erase_should_fail) = should_fail;
    }

    /// Make every operation fail, as if the backend were gone.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.set_read_should_fail(unavailable);
        self.set_write_should_fail(unavailable);
        self.set_erase_should_fail(unavailable);
    }

    /// Get a value without recording an operation.
    pub fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    /// All recorded operations.
    pub fn ops(&self) -> Vec<StoreOp> {
        lock(&self.ops).clone()
    }

    /// Clear recorded operations.
    pub fn clear_ops(&self) {
        lock(&self.ops).clear();
    }

    fn record(&self, op: StoreOp) {
        lock(&self.ops).push(op);
    }
}

impl KeyValueStore for InMemoryStore {
    fn read(&self, key: &str) -> PersistenceResult<Option<String>> {
        self.record(StoreOp::Read(key.to_string()));
        if *lock(&self.read_should_fail) {
            return Err(PersistenceError::Unavailable("Mock read failure".to_string()));
        }
        Ok(lock(&self.entries).get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> PersistenceResult<()> {
        self.record(StoreOp::Write(key.to_string(), value.to_string()));
        if *lock(&self.write_should_fail) {
            return Err(PersistenceError::Unavailable("Mock write failure".to_string()));
        }
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn erase(&self, key: &str) -> PersistenceResult<()> {
        self.record(StoreOp::Erase(key.to_string()));
        if *lock(&self.erase_should_fail) {
            return Err(PersistenceError::Unavailable("Mock erase failure".to_string()));
        }
        lock(&self.entries).remove(key);
        Ok(())
    }
}
