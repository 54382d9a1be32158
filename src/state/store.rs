//! The application store.
//!
//! `AppStore` is the single writer of [`AppSnapshot`]. Every change goes
//! through one of its action methods, which compute the next snapshot,
//! publish it to subscribers and mirror theme/identity into persistence.
//! Handles are cheap to clone; all clones share the same state.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use super::identity::{Identity, Profile};
use super::notifications::{Notification, NotificationId, NotificationKind, NotificationQueue};
use super::theme::Theme;
use crate::adapters::mock::InMemoryStore;
use crate::config::StoreConfig;
use crate::error::PersistenceError;
use crate::traits::KeyValueStore;
use crate::util::lock;

/// Immutable view of the application state at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppSnapshot {
    /// Signed-in user, if any
    pub identity: Option<Identity>,
    /// Global busy indicator
    pub is_loading: bool,
    pub sidebar_open: bool,
    pub theme: Theme,
    /// Visible notifications, oldest first
    pub notifications: NotificationQueue,
}

impl AppSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.identity
            .as_ref()
            .map(|identity| identity.is_authenticated)
            .unwrap_or(false)
    }

    pub fn is_dark(&self) -> bool {
        self.theme.is_dark()
    }
}

/// Handle to the shared application store.
///
/// # Example
///
/// ```ignore
/// use velocollab::state::{AppStore, NotificationKind, Profile};
///
/// let store = AppStore::new(Arc::new(file_store), StoreConfig::default());
/// let mut rx = store.subscribe();
///
/// store.login(Profile::new("user-1", "Ada", "ada@example.com"));
/// rx.changed().await?;
/// assert!(rx.borrow().is_authenticated());
/// ```
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    /// Holds the current snapshot and fans it out to subscribers
    state: watch::Sender<AppSnapshot>,
    persistence: Arc<dyn KeyValueStore>,
    config: StoreConfig,
    /// Serializes actions so transitions and their persisted writes are ordered
    writer: Mutex<()>,
    /// Pending auto-removals by notification id
    expiry_tasks: Mutex<HashMap<NotificationId, ExpiryTask>>,
}

/// A scheduled removal: the timer task and the instant it is due.
struct ExpiryTask {
    handle: AbortHandle,
    deadline: Instant,
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        for (_, task) in lock(&self.expiry_tasks).drain() {
            task.handle.abort();
        }
    }
}

impl fmt::Debug for AppStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppStore")
            .field("snapshot", &*self.inner.state.borrow())
            .field("config", &self.inner.config)
            .finish()
    }
}

impl AppStore {
    /// Create a store, seeding the initial snapshot from `persistence`.
    ///
    /// Missing, unreadable or malformed persisted values fall back to the
    /// defaults (light theme, no identity). The hydrated values are written
    /// back so persistence matches memory from the start.
    pub fn new(persistence: Arc<dyn KeyValueStore>, config: StoreConfig) -> Self {
        let snapshot = hydrate(persistence.as_ref(), &config);
        debug!(
            "Store hydrated: theme={}, authenticated={}",
            snapshot.theme,
            snapshot.is_authenticated()
        );

        let (state, _) = watch::channel(snapshot);
        let store = Self {
            inner: Arc::new(StoreInner {
                state,
                persistence,
                config,
                writer: Mutex::new(()),
                expiry_tasks: Mutex::new(HashMap::new()),
            }),
        };

        {
            let _writer = lock(&store.inner.writer);
            let snapshot = store.inner.state.borrow().clone();
            store.persist_theme(snapshot.theme);
            store.persist_identity(snapshot.identity.as_ref());
        }

        store
    }

    /// Create a store backed by a fresh in-memory persistence.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()), StoreConfig::default())
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    // ========== Reading ==========

    /// The current snapshot.
    ///
    /// Notifications whose lifetime has elapsed are removed first, even if
    /// their timer task has not run yet.
    pub fn snapshot(&self) -> AppSnapshot {
        self.prune_due();
        self.inner.state.borrow().clone()
    }

    /// Register an observer of future snapshots.
    ///
    /// The receiver always yields the latest snapshot; dropping it
    /// unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<AppSnapshot> {
        self.inner.state.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.inner.state.receiver_count()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.inner.state.borrow().identity.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    pub fn theme(&self) -> Theme {
        self.inner.state.borrow().theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme().is_dark()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().is_loading
    }

    pub fn sidebar_open(&self) -> bool {
        self.inner.state.borrow().sidebar_open
    }

    /// Visible notifications. Expired entries are pruned as in [`snapshot`](Self::snapshot).
    pub fn notifications(&self) -> NotificationQueue {
        self.prune_due();
        self.inner.state.borrow().notifications.clone()
    }

    /// Number of notifications with a pending auto-removal.
    pub fn pending_expiry_count(&self) -> usize {
        lock(&self.inner.expiry_tasks).len()
    }

    // ========== Identity actions ==========

    pub fn set_identity(&self, identity: Option<Identity>) {
        self.dispatch("set_identity", |s| s.identity = identity);
    }

    /// Sign in with `profile`, marking the identity authenticated.
    pub fn login(&self, profile: Profile) {
        let identity = profile.authenticate();
        self.dispatch("login", |s| s.identity = Some(identity));
    }

    /// Sign out. The persisted identity is erased even if none was set.
    pub fn logout(&self) {
        let _writer = lock(&self.inner.writer);
        self.transition("logout", |s| s.identity = None);
        self.persist_identity(None);
    }

    // ========== UI actions ==========

    pub fn set_loading(&self, loading: bool) {
        self.dispatch("set_loading", |s| s.is_loading = loading);
    }

    pub fn set_sidebar_open(&self, open: bool) {
        self.dispatch("set_sidebar_open", |s| s.sidebar_open = open);
    }

    pub fn toggle_sidebar(&self) {
        self.dispatch("toggle_sidebar", |s| s.sidebar_open = !s.sidebar_open);
    }

    pub fn set_theme(&self, theme: Theme) {
        self.dispatch("set_theme", |s| s.theme = theme);
    }

    pub fn toggle_theme(&self) {
        self.dispatch("toggle_theme", |s| s.theme = s.theme.toggled());
    }

    // ========== Notification actions ==========

    /// Append a notification and schedule its automatic removal.
    ///
    /// Returns the generated id; observers see it in the next snapshot.
    pub fn add_notification(
        &self,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> NotificationId {
        let notification = Notification::new(kind, title, message);
        let id = notification.id.clone();
        self.dispatch("add_notification", |s| {
            s.notifications.push(notification);
        });
        self.schedule_expiry(id.clone());
        id
    }

    /// Remove a notification. Unknown ids are ignored.
    pub fn remove_notification(&self, id: &NotificationId) {
        self.dispatch("remove_notification", |s| {
            s.notifications.remove(id);
        });
        if let Some(task) = lock(&self.inner.expiry_tasks).remove(id) {
            task.handle.abort();
        }
    }

    /// Remove every notification and cancel their pending removals.
    pub fn clear_notifications(&self) {
        self.dispatch("clear_notifications", |s| s.notifications.clear());
        for (_, task) in lock(&self.inner.expiry_tasks).drain() {
            task.handle.abort();
        }
    }

    // ========== Internals ==========

    /// Run one action under the writer guard and mirror what it changed.
    fn dispatch<F>(&self, action: &'static str, mutate: F)
    where
        F: FnOnce(&mut AppSnapshot),
    {
        let _writer = lock(&self.inner.writer);
        if let Some((before, after)) = self.transition(action, mutate) {
            if before.theme != after.theme {
                self.persist_theme(after.theme);
            }
            if before.identity != after.identity {
                self.persist_identity(after.identity.as_ref());
            }
        }
    }

    /// Apply `mutate` and publish if anything changed. Caller holds the writer guard.
    fn transition<F>(&self, action: &'static str, mutate: F) -> Option<(AppSnapshot, AppSnapshot)>
    where
        F: FnOnce(&mut AppSnapshot),
    {
        let mut changed = None;
        self.inner.state.send_if_modified(|snapshot| {
            let before = snapshot.clone();
            mutate(snapshot);
            if *snapshot == before {
                return false;
            }
            changed = Some((before, snapshot.clone()));
            true
        });

        match &changed {
            Some(_) => debug!("Store action applied: {}", action),
            None => trace!("Store action was a no-op: {}", action),
        }
        changed
    }

    fn persist_theme(&self, theme: Theme) {
        let key = &self.inner.config.theme_key;
        if let Err(e) = self.inner.persistence.write(key, theme.as_str()) {
            warn!("Failed to persist theme: {}", e);
        }
    }

    fn persist_identity(&self, identity: Option<&Identity>) {
        let key = &self.inner.config.user_key;
        let result = match identity {
            Some(identity) => identity
                .encode()
                .map_err(PersistenceError::from)
                .and_then(|json| self.inner.persistence.write(key, &json)),
            None => self.inner.persistence.erase(key),
        };
        if let Err(e) = result {
            warn!("Failed to persist identity: {}", e);
        }
    }

    /// Spawn the auto-removal task for `id`.
    ///
    /// The task holds only a weak reference, so it never keeps the store
    /// alive. Without a tokio runtime nothing is scheduled.
    fn schedule_expiry(&self, id: NotificationId) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!(
                "No async runtime; notification {} will not expire automatically",
                id
            );
            return;
        };

        let weak: Weak<StoreInner> = Arc::downgrade(&self.inner);
        let deadline = Instant::now() + self.inner.config.notification_lifetime;
        let task_id = id.clone();

        // Held across spawn so the task cannot finish before it is registered
        let mut tasks = lock(&self.inner.expiry_tasks);
        let task = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(inner) = weak.upgrade() {
                AppStore { inner }.expire(&task_id);
            }
        });
        tasks.insert(
            id,
            ExpiryTask {
                handle: task.abort_handle(),
                deadline,
            },
        );
    }

    /// Remove every notification whose deadline has passed.
    fn prune_due(&self) {
        let now = Instant::now();
        let due: Vec<NotificationId> = {
            let mut tasks = lock(&self.inner.expiry_tasks);
            let due: Vec<NotificationId> = tasks
                .iter()
                .filter(|(_, task)| task.deadline <= now)
                .map(|(id, _)| id.clone())
                .collect();
            for id in &due {
                if let Some(task) = tasks.remove(id) {
                    task.handle.abort();
                }
            }
            due
        };

        if due.is_empty() {
            return;
        }
        trace!("Pruning {} expired notification(s)", due.len());
        self.dispatch("expire_notification", |s| {
            for id in &due {
                s.notifications.remove(id);
            }
        });
    }

    /// Timed removal. A no-op if the notification is already gone.
    fn expire(&self, id: &NotificationId) {
        lock(&self.inner.expiry_tasks).remove(id);
        trace!("Notification expired: {}", id);
        self.dispatch("expire_notification", |s| {
            s.notifications.remove(id);
        });
    }
}

/// Build the initial snapshot from persisted values.
fn hydrate(persistence: &dyn KeyValueStore, config: &StoreConfig) -> AppSnapshot {
    let mut snapshot = AppSnapshot::default();

    match persistence.read(&config.theme_key) {
        Ok(Some(raw)) => match raw.parse::<Theme>() {
            Ok(theme) => snapshot.theme = theme,
            Err(e) => warn!("Ignoring persisted theme: {}", e),
        },
        Ok(None) => {}
        Err(e) => warn!("Error loading persisted theme: {}", e),
    }

    match persistence.read(&config.user_key) {
        Ok(Some(raw)) => snapshot.identity = Identity::decode(&raw),
        Ok(None) => {}
        Err(e) => warn!("Error loading persisted identity: {}", e),
    }

    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::StoreOp;
    use std::time::Duration;

    fn test_store() -> (AppStore, InMemoryStore) {
        let persistence = InMemoryStore::new();
        let store = AppStore::new(Arc::new(persistence.clone()), StoreConfig::default());
        persistence.clear_ops();
        (store, persistence)
    }

    fn ada() -> Profile {
        Profile::new("user-1", "Ada", "ada@example.com")
    }

    // ========== Hydration ==========

    #[test]
    fn test_defaults_when_nothing_persisted() {
        let (store, persistence) = test_store();
        let snapshot = store.snapshot();

        assert_eq!(snapshot, AppSnapshot::default());
        assert_eq!(snapshot.theme, Theme::Light);
        assert!(snapshot.identity.is_none());
        assert_eq!(persistence.get("velocollab-theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_hydrates_theme_and_identity() {
        let identity = ada().authenticate();
        let persistence = InMemoryStore::new()
            .with_entry("velocollab-theme", "dark")
            .with_entry("velocollab-user", &identity.encode().unwrap());

        let store = AppStore::new(Arc::new(persistence), StoreConfig::default());

        assert_eq!(store.theme(), Theme::Dark);
        assert_eq!(store.identity(), Some(identity));
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_malformed_persisted_values_fall_back() {
        let persistence = InMemoryStore::new()
            .with_entry("velocollab-theme", "neon")
            .with_entry("velocollab-user", "{broken");

        let store = AppStore::new(Arc::new(persistence.clone()), StoreConfig::default());

        assert_eq!(store.theme(), Theme::Light);
        assert!(store.identity().is_none());
        // Fallback values are written back over the bad ones
        assert_eq!(persistence.get("velocollab-theme").as_deref(), Some("light"));
        assert_eq!(persistence.get("velocollab-user"), None);
    }

    #[test]
    fn test_unavailable_persistence_does_not_break_init() {
        let persistence = InMemoryStore::new();
        persistence.set_unavailable(true);

        let store = AppStore::new(Arc::new(persistence), StoreConfig::default());
        assert_eq!(store.snapshot(), AppSnapshot::default());

        // Actions keep working in memory
        store.toggle_theme();
        assert_eq!(store.theme(), Theme::Dark);
    }

    #[test]
    fn test_custom_keys() {
        let persistence = InMemoryStore::new().with_entry("my-theme", "dark");
        let config = StoreConfig::default()
            .with_theme_key("my-theme")
            .with_user_key("my-user");

        let store = AppStore::new(Arc::new(persistence.clone()), config);
        store.login(ada());

        assert_eq!(store.theme(), Theme::Dark);
        assert!(persistence.get("my-user").is_some());
        assert!(persistence.get("velocollab-user").is_none());
    }

    // ========== Identity ==========

    #[test]
    fn test_login_sets_authenticated_and_persists() {
        let (store, persistence) = test_store();
        store.login(ada());

        let identity = store.identity().unwrap();
        assert!(identity.is_authenticated);
        assert_eq!(
            Identity::decode(&persistence.get("velocollab-user").unwrap()),
            Some(identity)
        );
    }

    #[test]
    fn test_set_identity_none_erases() {
        let (store, persistence) = test_store();
        store.login(ada());
        store.set_identity(None);

        assert!(store.identity().is_none());
        assert!(persistence.get("velocollab-user").is_none());
    }

    #[test]
    fn test_set_identity_unauthenticated() {
        let (store, _) = test_store();
        let mut identity = ada().authenticate();
        identity.is_authenticated = false;
        store.set_identity(Some(identity));

        assert!(store.identity().is_some());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_logout_always_erases() {
        let (store, persistence) = test_store();
        store.logout();
        assert_eq!(
            persistence.ops(),
            vec![StoreOp::Erase("velocollab-user".to_string())]
        );

        store.login(ada());
        store.logout();
        assert!(store.identity().is_none());
        assert!(persistence.get("velocollab-user").is_none());
    }

    #[test]
    fn test_logout_erase_failure_is_swallowed() {
        let (store, persistence) = test_store();
        store.login(ada());
        persistence.set_erase_should_fail(true);

        store.logout();
        assert!(store.identity().is_none());
    }

    // ========== UI flags ==========

    #[test]
    fn test_flags() {
        let (store, persistence) = test_store();

        store.set_loading(true);
        assert!(store.is_loading());
        store.set_sidebar_open(true);
        assert!(store.sidebar_open());
        store.toggle_sidebar();
        assert!(!store.sidebar_open());

        // Flags are not persisted
        assert!(persistence.ops().is_empty());
    }

    #[test]
    fn test_toggle_theme_twice_restores_and_persists() {
        let (store, persistence) = test_store();

        store.toggle_theme();
        assert_eq!(store.theme(), Theme::Dark);
        assert!(store.is_dark());
        assert_eq!(persistence.get("velocollab-theme").as_deref(), Some("dark"));

        store.toggle_theme();
        assert_eq!(store.theme(), Theme::Light);
        assert_eq!(persistence.get("velocollab-theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_unchanged_theme_is_not_rewritten() {
        let (store, persistence) = test_store();
        store.set_theme(Theme::Light);
        assert!(persistence.ops().is_empty());
    }

    // ========== Subscription ==========

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let (store, _) = test_store();
        let mut first = store.subscribe();
        let mut second = store.subscribe();
        assert_eq!(store.subscriber_count(), 2);

        store.set_theme(Theme::Dark);

        first.changed().await.unwrap();
        second.changed().await.unwrap();
        assert_eq!(first.borrow().theme, Theme::Dark);
        assert_eq!(second.borrow().theme, Theme::Dark);

        drop(second);
        assert_eq!(store.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_noop_actions_do_not_notify() {
        let (store, _) = test_store();
        let mut rx = store.subscribe();

        store.set_loading(false);
        store.remove_notification(&NotificationId::from("missing"));
        assert!(!rx.has_changed().unwrap());

        store.set_loading(true);
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn test_clones_share_state() {
        let (store, _) = test_store();
        let other = store.clone();
        other.toggle_sidebar();
        assert!(store.sidebar_open());
    }

    // ========== Notifications ==========

    #[tokio::test(start_paused = true)]
    async fn test_add_notification_appends_in_order() {
        let (store, _) = test_store();
        let a = store.add_notification(NotificationKind::Info, "A", "first");
        let b = store.add_notification(NotificationKind::Success, "B", "second");

        assert_ne!(a, b);
        assert_eq!(store.notifications().ids(), vec![a, b]);
        assert_eq!(store.pending_expiry_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_expires_after_lifetime() {
        let (store, _) = test_store();
        let id = store.add_notification(NotificationKind::Warning, "Heads up", "soon gone");

        tokio::time::sleep(Duration::from_millis(4999)).await;
        assert!(store.notifications().contains(&id));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!store.notifications().contains(&id));
        assert_eq!(store.pending_expiry_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notification_gone_at_exact_lifetime() {
        let (store, _) = test_store();
        let mut rx = store.subscribe();
        let id = store.add_notification(NotificationKind::Info, "Exact", "boundary");
        rx.borrow_and_update();

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert!(!store.notifications().contains(&id));
        assert!(!store.snapshot().notifications.contains(&id));
        assert_eq!(store.pending_expiry_count(), 0);

        // Subscribers are told about the removal
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().notifications.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_exact_lifetime_leaves_younger_notifications() {
        let (store, _) = test_store();
        let old = store.add_notification(NotificationKind::Info, "Old", "first");
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let young = store.add_notification(NotificationKind::Info, "Young", "second");

        tokio::time::sleep(Duration::from_millis(4000)).await;
        assert_eq!(store.notifications().ids(), vec![young]);
        assert!(!store.snapshot().notifications.contains(&old));
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_removal_cancels_expiry() {
        let (store, _) = test_store();
        let id = store.add_notification(NotificationKind::Info, "t", "m");

        store.remove_notification(&id);
        assert!(store.notifications().is_empty());
        assert_eq!(store.pending_expiry_count(), 0);

        // Removing again is a no-op
        store.remove_notification(&id);

        tokio::time::sleep(Duration::from_millis(6000)).await;
        assert!(store.notifications().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_does_not_resurrect() {
        let (store, _) = test_store();
        store.add_notification(NotificationKind::Error, "e", "1");
        store.add_notification(NotificationKind::Error, "e", "2");

        store.clear_notifications();
        assert!(store.notifications().is_empty());
        assert_eq!(store.pending_expiry_count(), 0);

        let later = store.add_notification(NotificationKind::Info, "i", "3");
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(store.notifications().ids(), vec![later]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_lifetime() {
        let config = StoreConfig::default().with_notification_lifetime(Duration::from_millis(50));
        let store = AppStore::new(Arc::new(InMemoryStore::new()), config);
        store.add_notification(NotificationKind::Info, "quick", "m");

        tokio::time::sleep(Duration::from_millis(51)).await;
        assert!(store.notifications().is_empty());
    }

    #[test]
    fn test_add_notification_without_runtime() {
        let (store, _) = test_store();
        let id = store.add_notification(NotificationKind::Info, "t", "m");
        assert!(store.notifications().contains(&id));
        assert_eq!(store.pending_expiry_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_store_expiry_is_noop() {
        let (store, _) = test_store();
        let mut rx = store.subscribe();
        store.add_notification(NotificationKind::Info, "t", "m");
        rx.borrow_and_update();
        drop(store);

        tokio::time::sleep(Duration::from_millis(6000)).await;
        // Sender is gone, nothing panicked
        assert!(rx.changed().await.is_err());
    }

    #[test]
    fn test_snapshot_serializes() {
        let (store, _) = test_store();
        store.login(ada());
        let value = serde_json::to_value(store.snapshot()).unwrap();
        assert_eq!(value["theme"], "light");
        assert_eq!(value["identity"]["isAuthenticated"], true);
    }
}
