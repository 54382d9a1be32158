//! Key-value persistence trait abstraction.
//!
//! The application store mirrors a small amount of state (theme, identity)
//! into a durable string-keyed store so it survives restarts. This trait is
//! the seam between the store and whatever backs it.

use crate::error::PersistenceResult;

/// Durable string-keyed storage.
///
/// Implementations must not cache: every call goes to the backing store.
/// A missing key is not an error.
///
/// # Example
///
/// ```ignore
/// use velocollab::traits::KeyValueStore;
///
/// fn remember_theme<S: KeyValueStore>(store: &S) -> PersistenceResult<()> {
///     store.write("velocollab-theme", "dark")?;
///     assert_eq!(store.read("velocollab-theme")?.as_deref(), Some("dark"));
///     Ok(())
/// }
/// ```
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Returns
    /// - `Ok(Some(value))` if the key exists
    /// - `Ok(None)` if it does not
    /// - `Err(error)` if the backend failed
    fn read(&self, key: &str) -> PersistenceResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn write(&self, key: &str, value: &str) -> PersistenceResult<()>;

    /// Remove `key`. Erasing a missing key succeeds.
    fn erase(&self, key: &str) -> PersistenceResult<()>;
}
