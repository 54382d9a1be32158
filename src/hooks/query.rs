//! Resource request tracking.
//!
//! A [`QueryHook`] wraps an async producer and tracks `{data, loading, error}`
//! for it. The producer runs again whenever the dependency key changes (if
//! `immediate`) or when [`QueryHook::refetch`] is called.
//!
//! Calls are not deduplicated. Without fencing, overlapping calls all write
//! their outcome and the one that settles last wins, even if it was started
//! first. With [`QueryOptions::fenced`] only the most recently started call
//! may write.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::UNEXPECTED_ERROR;
use crate::state::{AppStore, NotificationKind};
use crate::util::lock;

/// Called with the result of a successful fetch.
pub type SuccessCallback<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Called with the message of a failed fetch.
pub type ErrorCallback = Arc<dyn Fn(&str) + Send + Sync>;

type Producer<T, K> = Arc<dyn Fn(K) -> BoxFuture<'static, Result<T, String>> + Send + Sync>;

/// Tracked state of one hook.
///
/// During a refetch the previous `data` stays visible while `loading` is
/// true; the settled outcome replaces it.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
        }
    }
}

/// Options for a [`QueryHook`].
///
/// # Example
///
/// ```ignore
/// let options = QueryOptions::new()
///     .immediate(false)
///     .surface_errors(true)
///     .on_success(|user: &User| tracing::info!("Loaded {}", user.name));
/// ```
pub struct QueryOptions<T> {
    /// Fetch on activation and on dependency change (default: true)
    pub immediate: bool,
    pub on_success: Option<SuccessCallback<T>>,
    pub on_error: Option<ErrorCallback>,
    /// Also push an error notification to the store (default: false)
    pub surface_errors: bool,
    /// Drop outcomes of superseded calls (default: false)
    pub fenced: bool,
}

impl<T> Default for QueryOptions<T> {
    fn default() -> Self {
        Self {
            immediate: true,
            on_success: None,
            on_error: None,
            surface_errors: false,
            fenced: false,
        }
    }
}

impl<T> Clone for QueryOptions<T> {
    fn clone(&self) -> Self {
        Self {
            immediate: self.immediate,
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
            surface_errors: self.surface_errors,
            fenced: self.fenced,
        }
    }
}

impl<T> fmt::Debug for QueryOptions<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryOptions")
            .field("immediate", &self.immediate)
            .field("on_success", &self.on_success.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("surface_errors", &self.surface_errors)
            .field("fenced", &self.fenced)
            .finish()
    }
}

impl<T> QueryOptions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    pub fn on_success(mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.on_success = Some(Arc::new(callback));
        self
    }

    pub fn on_error(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    pub fn surface_errors(mut self, surface: bool) -> Self {
        self.surface_errors = surface;
        self
    }

    pub fn fenced(mut self, fenced: bool) -> Self {
        self.fenced = fenced;
        self
    }
}

/// Tracks one async resource. Clones share the same state.
pub struct QueryHook<T, K = ()> {
    inner: Arc<QueryInner<T, K>>,
}

struct QueryInner<T, K> {
    store: AppStore,
    producer: Producer<T, K>,
    options: QueryOptions<T>,
    state: watch::Sender<RequestState<T>>,
    deps: Mutex<K>,
    activated: AtomicBool,
    /// Number of calls started so far; the latest call holds the max
    generation: AtomicU64,
}

impl<T, K> Clone for QueryHook<T, K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug, K: fmt::Debug> fmt::Debug for QueryHook<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryHook")
            .field("state", &*self.inner.state.borrow())
            .field("deps", &*lock(&self.inner.deps))
            .field("options", &self.inner.options)
            .finish()
    }
}

impl<T> QueryHook<T, ()>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a hook around a zero-argument producer.
    ///
    /// Nothing runs until [`activate`](Self::activate) or
    /// [`refetch`](Self::refetch).
    pub fn new<F, Fut, E>(store: AppStore, producer: F, options: QueryOptions<T>) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display + 'static,
    {
        Self::with_dependencies(store, (), move |()| producer(), options)
    }
}

impl<T, K> QueryHook<T, K>
where
    T: Clone + Send + Sync + 'static,
    K: Clone + PartialEq + Send + 'static,
{
    /// Create a hook whose producer receives the current dependency key.
    pub fn with_dependencies<F, Fut, E>(
        store: AppStore,
        deps: K,
        producer: F,
        options: QueryOptions<T>,
    ) -> Self
    where
        F: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        E: fmt::Display + 'static,
    {
        let producer: Producer<T, K> = Arc::new(move |deps| {
            producer(deps)
                .map(|result| result.map_err(|e| e.to_string()))
                .boxed()
        });
        let (state, _) = watch::channel(RequestState::default());

        Self {
            inner: Arc::new(QueryInner {
                store,
                producer,
                options,
                state,
                deps: Mutex::new(deps),
                activated: AtomicBool::new(false),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// First activation. Spawns a fetch if `immediate`; later calls do nothing.
    pub fn activate(&self) -> Option<JoinHandle<()>> {
        if self.inner.activated.swap(true, Ordering::SeqCst) {
            return None;
        }
        self.spawn_if_immediate()
    }

    /// Replace the dependency key.
    ///
    /// If the key changed and the hook is active, spawns a fetch when
    /// `immediate`. Before activation the key is only recorded.
    pub fn set_dependencies(&self, deps: K) -> Option<JoinHandle<()>> {
        {
            let mut current = lock(&self.inner.deps);
            if *current == deps {
                return None;
            }
            *current = deps;
        }

        if !self.inner.activated.load(Ordering::SeqCst) {
            return None;
        }
        self.spawn_if_immediate()
    }

    /// Run the producer and record its outcome.
    ///
    /// Safe to call repeatedly; each call runs the producer again.
    pub async fn refetch(&self) {
        let inner = &self.inner;
        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        inner.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let deps = lock(&inner.deps).clone();
        let result = (inner.producer)(deps).await;

        if inner.options.fenced && inner.generation.load(Ordering::SeqCst) != generation {
            debug!("Discarding superseded query result (call {})", generation);
            return;
        }

        // The settled outcome and `loading = false` are published together;
        // callbacks run after observers can see them.
        match result {
            Ok(data) => {
                inner.state.send_modify(|s| {
                    s.data = Some(data.clone());
                    s.error = None;
                    s.loading = false;
                });
                if let Some(callback) = &inner.options.on_success {
                    callback(&data);
                }
            }
            Err(message) => {
                let message = if message.trim().is_empty() {
                    UNEXPECTED_ERROR.to_string()
                } else {
                    message
                };
                debug!("Query failed: {}", message);

                if inner.options.surface_errors {
                    inner
                        .store
                        .add_notification(NotificationKind::Error, "Error", message.clone());
                }
                inner.state.send_modify(|s| {
                    s.data = None;
                    s.error = Some(message.clone());
                    s.loading = false;
                });
                if let Some(callback) = &inner.options.on_error {
                    callback(&message);
                }
            }
        }
    }

    pub fn data(&self) -> Option<T> {
        self.inner.state.borrow().data.clone()
    }

    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    pub fn state(&self) -> RequestState<T> {
        self.inner.state.borrow().clone()
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<RequestState<T>> {
        self.inner.state.subscribe()
    }

    pub fn dependencies(&self) -> K {
        lock(&self.inner.deps).clone()
    }

    pub fn is_active(&self) -> bool {
        self.inner.activated.load(Ordering::SeqCst)
    }

    fn spawn_if_immediate(&self) -> Option<JoinHandle<()>> {
        if !self.inner.options.immediate {
            return None;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let hook = self.clone();
                Some(runtime.spawn(async move { hook.refetch().await }))
            }
            Err(_) => {
                warn!("No async runtime; skipping automatic fetch");
                None
            }
        }
    }
}
