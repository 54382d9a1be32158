//! Dashboard-specific hooks.
//!
//! Each function wires a [`DashboardApi`] call into a [`QueryHook`] or
//! [`MutationHook`] with the options the dashboard pages use. Query hooks
//! come back activated, so an immediate fetch is already running.

use futures::future::BoxFuture;
use std::sync::Arc;

use crate::error::ApiError;
use crate::hooks::{MutationHook, QueryHook, QueryOptions};
use crate::models::{
    Exercise, ExerciseFilters, HealthStatus, User, UserStats, WorkoutCreate, WorkoutFilters,
    WorkoutResponse, WorkoutSummary,
};
use crate::state::AppStore;
use crate::traits::DashboardApi;

/// Shared API handle passed to every hook.
pub type SharedApi = Arc<dyn DashboardApi>;

fn surfaced<T>() -> QueryOptions<T> {
    QueryOptions::new().surface_errors(true)
}

fn activated<T, K>(hook: QueryHook<T, K>) -> QueryHook<T, K>
where
    T: Clone + Send + Sync + 'static,
    K: Clone + PartialEq + Send + 'static,
{
    hook.activate();
    hook
}

pub fn use_current_user(api: SharedApi, store: AppStore) -> QueryHook<User> {
    activated(QueryHook::new(
        store,
        move || -> BoxFuture<'static, Result<User, ApiError>> {
            let api = api.clone();
            Box::pin(async move { api.current_user().await })
        },
        surfaced(),
    ))
}

pub fn use_user_stats(api: SharedApi, store: AppStore) -> QueryHook<UserStats> {
    activated(QueryHook::new(
        store,
        move || -> BoxFuture<'static, Result<UserStats, ApiError>> {
            let api = api.clone();
            Box::pin(async move { api.user_stats().await })
        },
        surfaced(),
    ))
}

/// Exercise list, refetched whenever the filters change.
pub fn use_exercises(
    api: SharedApi,
    store: AppStore,
    filters: Option<ExerciseFilters>,
) -> QueryHook<Vec<Exercise>, Option<ExerciseFilters>> {
    activated(QueryHook::with_dependencies(
        store,
        filters,
        move |filters| -> BoxFuture<'static, Result<Vec<Exercise>, ApiError>> {
            let api = api.clone();
            Box::pin(async move { api.exercises(filters).await })
        },
        surfaced(),
    ))
}

pub fn use_exercise(
    api: SharedApi,
    store: AppStore,
    exercise_id: impl Into<String>,
) -> QueryHook<Exercise, String> {
    activated(QueryHook::with_dependencies(
        store,
        exercise_id.into(),
        move |id: String| -> BoxFuture<'static, Result<Exercise, ApiError>> {
            let api = api.clone();
            Box::pin(async move { api.exercise(&id).await })
        },
        surfaced(),
    ))
}

/// Workout list, refetched whenever the filters change.
pub fn use_workouts(
    api: SharedApi,
    store: AppStore,
    filters: Option<WorkoutFilters>,
) -> QueryHook<Vec<WorkoutSummary>, Option<WorkoutFilters>> {
    activated(QueryHook::with_dependencies(
        store,
        filters,
        move |filters| -> BoxFuture<'static, Result<Vec<WorkoutSummary>, ApiError>> {
            let api = api.clone();
            Box::pin(async move { api.workouts(filters).await })
        },
        surfaced(),
    ))
}

pub fn use_workout(
    api: SharedApi,
    store: AppStore,
    workout_id: impl Into<String>,
) -> QueryHook<WorkoutResponse, String> {
    activated(QueryHook::with_dependencies(
        store,
        workout_id.into(),
        move |id: String| -> BoxFuture<'static, Result<WorkoutResponse, ApiError>> {
            let api = api.clone();
            Box::pin(async move { api.workout(&id).await })
        },
        surfaced(),
    ))
}

pub fn use_workout_templates(api: SharedApi, store: AppStore) -> QueryHook<Vec<WorkoutResponse>> {
    activated(QueryHook::new(
        store,
        move || -> BoxFuture<'static, Result<Vec<WorkoutResponse>, ApiError>> {
            let api = api.clone();
            Box::pin(async move { api.workout_templates().await })
        },
        surfaced(),
    ))
}

/// Health check. Runs only on explicit `refetch` and never notifies.
pub fn use_health_check(api: SharedApi, store: AppStore) -> QueryHook<HealthStatus> {
    activated(QueryHook::new(
        store,
        move || -> BoxFuture<'static, Result<HealthStatus, ApiError>> {
            let api = api.clone();
            Box::pin(async move { api.health_check().await })
        },
        QueryOptions::new().immediate(false),
    ))
}

pub fn use_create_workout(
    api: SharedApi,
    store: AppStore,
) -> MutationHook<WorkoutCreate, WorkoutResponse> {
    MutationHook::new(
        store,
        move |workout: WorkoutCreate| -> BoxFuture<'static, Result<WorkoutResponse, ApiError>> {
            let api = api.clone();
            Box::pin(async move { api.create_workout(workout).await })
        },
        |workout: &WorkoutCreate| format!("Workout \"{}\" created successfully!", workout.name),
    )
    .with_fallback_error("Failed to create workout")
}

/// Delete a workout by id.
///
/// Resolves to `Some(())` on success; see [`delete_workout`] for the
/// boolean form.
pub fn use_delete_workout(api: SharedApi, store: AppStore) -> MutationHook<String, ()> {
    MutationHook::new(
        store,
        move |workout_id: String| -> BoxFuture<'static, Result<(), ApiError>> {
            let api = api.clone();
            Box::pin(async move { api.delete_workout(&workout_id).await })
        },
        |_: &String| "Workout deleted successfully!".to_string(),
    )
    .with_fallback_error("Failed to delete workout")
}

/// Run a delete mutation and report whether it succeeded.
pub async fn delete_workout(hook: &MutationHook<String, ()>, workout_id: impl Into<String>) -> bool {
    hook.invoke(workout_id.into()).await.is_some()
}

/// Current user and stats tracked together.
#[derive(Debug, Clone)]
pub struct UserData {
    pub user_query: QueryHook<User>,
    pub stats_query: QueryHook<UserStats>,
}

impl UserData {
    pub fn user(&self) -> Option<User> {
        self.user_query.data()
    }

    pub fn stats(&self) -> Option<UserStats> {
        self.stats_query.data()
    }

    /// Loading while either query is.
    pub fn loading(&self) -> bool {
        self.user_query.loading() || self.stats_query.loading()
    }

    /// The user error if any, otherwise the stats error.
    pub fn error(&self) -> Option<String> {
        self.user_query.error().or_else(|| self.stats_query.error())
    }

    /// Refetch both concurrently.
    pub async fn refetch(&self) {
        futures::join!(self.user_query.refetch(), self.stats_query.refetch());
    }
}

pub fn use_user_data(api: SharedApi, store: AppStore) -> UserData {
    UserData {
        user_query: use_current_user(api.clone(), store.clone()),
        stats_query: use_user_stats(api, store),
    }
}
