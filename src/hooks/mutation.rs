//! Single-shot async actions (create, delete, ...).
//!
//! A [`MutationHook`] runs its action with an argument supplied at call
//! time, reports the outcome as a notification, and tracks `{loading, error}`
//! for the most recently started call.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tracing::debug;

use super::UNEXPECTED_ERROR;
use crate::state::{AppStore, NotificationKind};
use crate::util::lock;

type Action<A, R> = Arc<dyn Fn(A) -> BoxFuture<'static, Result<R, String>> + Send + Sync>;
type MessageTemplate<A> = Arc<dyn Fn(&A) -> String + Send + Sync>;

/// Tracked state of a mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationState {
    pub loading: bool,
    pub error: Option<String>,
}

/// Wraps one async action. Clones share the same state.
///
/// # Example
///
/// ```ignore
/// let create = MutationHook::new(
///     store.clone(),
///     move |workout: WorkoutCreate| { let api = api.clone(); async move { api.create_workout(workout).await } },
///     |workout| format!("Workout \"{}\" created successfully!", workout.name),
/// )
/// .with_fallback_error("Failed to create workout");
///
/// match create.invoke(WorkoutCreate::new("Leg day")).await {
///     Some(workout) => show(workout),
///     None => {} // create.error() has the message
/// }
/// ```
pub struct MutationHook<A, R> {
    inner: Arc<MutationInner<A, R>>,
}

struct MutationInner<A, R> {
    store: AppStore,
    action: Action<A, R>,
    success_message: MessageTemplate<A>,
    fallback_error: Mutex<String>,
    state: watch::Sender<MutationState>,
    generation: AtomicU64,
}

impl<A, R> Clone for MutationHook<A, R> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, R> fmt::Debug for MutationHook<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationHook")
            .field("state", &*self.inner.state.borrow())
            .field("fallback_error", &*lock(&self.inner.fallback_error))
            .finish()
    }
}

impl<A, R> MutationHook<A, R>
where
    A: Send + 'static,
    R: Send + 'static,
{
    /// Create a hook around `action`.
    ///
    /// `success_message` renders the text of the success notification from
    /// the call's argument.
    pub fn new<F, Fut, E, M>(store: AppStore, action: F, success_message: M) -> Self
    where
        F: Fn(A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        E: fmt::Display + 'static,
        M: Fn(&A) -> String + Send + Sync + 'static,
    {
        let action: Action<A, R> = Arc::new(move |args| {
            action(args)
                .map(|result| result.map_err(|e| e.to_string()))
                .boxed()
        });
        let (state, _) = watch::channel(MutationState::default());

        Self {
            inner: Arc::new(MutationInner {
                store,
                action,
                success_message: Arc::new(success_message),
                fallback_error: Mutex::new(UNEXPECTED_ERROR.to_string()),
                state,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Message used when the action fails without one.
    ///
    /// Applies to every clone of the hook.
    pub fn with_fallback_error(self, message: impl Into<String>) -> Self {
        *lock(&self.inner.fallback_error) = message.into();
        self
    }

    /// Run the action.
    ///
    /// Returns the result, or `None` on failure after recording the error
    /// and pushing an error notification. Never propagates the failure.
    pub async fn invoke(&self, args: A) -> Option<R> {
        let inner = &self.inner;
        let generation = inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        inner.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        let success_message = (inner.success_message)(&args);
        let result = (inner.action)(args).await;
        let latest = inner.generation.load(Ordering::SeqCst) == generation;

        match result {
            Ok(value) => {
                inner
                    .store
                    .add_notification(NotificationKind::Success, "Success", success_message);
                if latest {
                    inner.state.send_modify(|s| s.loading = false);
                }
                Some(value)
            }
            Err(message) => {
                let message = if message.trim().is_empty() {
                    lock(&inner.fallback_error).clone()
                } else {
                    message
                };
                debug!("Mutation failed: {}", message);

                if latest {
                    inner.state.send_modify(|s| {
                        s.error = Some(message.clone());
                        s.loading = false;
                    });
                }
                inner
                    .store
                    .add_notification(NotificationKind::Error, "Error", message);
                None
            }
        }
    }

    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    pub fn state(&self) -> MutationState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<MutationState> {
        self.inner.state.subscribe()
    }
}
