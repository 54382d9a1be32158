//! Common test utilities for integration tests.
//!
//! Fixtures for API payloads, store builders over file or in-memory
//! persistence, and helpers that wait for hooks to settle.
//!
//! # Example
//!
//! ```ignore
//! let (store, _dir) = file_backed_store();
//! let api = scripted_api();
//! let user = use_current_user(shared(&api), store.clone());
//! let state = settled(&user).await;
//! ```

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use velocollab::adapters::mock::{Endpoint, MockReply};
use velocollab::adapters::{FileKeyValueStore, MockDashboardApi};
use velocollab::config::StoreConfig;
use velocollab::hooks::{QueryHook, RequestState};
use velocollab::models::{
    Exercise, User, UserStats, WorkoutResponse, WorkoutSummary,
};
use velocollab::queries::SharedApi;
use velocollab::state::AppStore;

// ========== Fixtures ==========

pub fn test_user() -> User {
    User {
        id: "user-1".to_string(),
        name: "Test Rider".to_string(),
        email: "rider@example.com".to_string(),
        avatar_url: None,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
        total_workouts: 42,
        current_streak: 5,
    }
}

pub fn test_stats() -> UserStats {
    UserStats {
        total_workouts: 42,
        current_streak: 5,
        longest_streak: 14,
        total_duration_hours: 37.5,
        favorite_exercises: Vec::new(),
        recent_prs: Vec::new(),
    }
}

pub fn test_exercise(id: &str, name: &str, category: &str) -> Exercise {
    Exercise {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        muscle_groups: vec!["legs".to_string()],
        equipment: None,
        instructions: None,
        is_custom: false,
        created_by: None,
    }
}

pub fn test_workout(id: &str, name: &str) -> WorkoutResponse {
    WorkoutResponse {
        id: id.to_string(),
        user_id: "user-1".to_string(),
        name: name.to_string(),
        notes: None,
        started_at: Utc.with_ymd_and_hms(2024, 3, 2, 7, 30, 0).unwrap(),
        completed_at: None,
        duration_seconds: None,
        exercises: Vec::new(),
        is_template: false,
        status: "planned".to_string(),
    }
}

pub fn test_summary(id: &str, name: &str) -> WorkoutSummary {
    WorkoutSummary {
        id: id.to_string(),
        name: name.to_string(),
        started_at: Utc.with_ymd_and_hms(2024, 3, 2, 7, 30, 0).unwrap(),
        completed_at: None,
        duration_seconds: None,
        exercise_count: 3,
        status: "completed".to_string(),
    }
}

// ========== Builders ==========

/// Config pointing at `dir` with default keys and lifetime.
pub fn config_in(dir: &TempDir) -> StoreConfig {
    StoreConfig::default().with_data_dir(dir.path())
}

/// Open a store over the file persistence configured in `config`.
pub fn open_store(config: &StoreConfig) -> AppStore {
    let persistence = FileKeyValueStore::new(config).expect("data dir configured");
    AppStore::new(Arc::new(persistence), config.clone())
}

/// A store persisted to a fresh temp directory. Keep the `TempDir` alive.
pub fn file_backed_store() -> (AppStore, TempDir) {
    let dir = TempDir::new().unwrap();
    let store = open_store(&config_in(&dir));
    (store, dir)
}

/// Mock API with user, stats and template endpoints answering successfully.
pub fn scripted_api() -> MockDashboardApi {
    let api = MockDashboardApi::new();
    api.set_default(Endpoint::CurrentUser, MockReply::ok(&test_user()));
    api.set_default(Endpoint::UserStats, MockReply::ok(&test_stats()));
    api.set_default(
        Endpoint::WorkoutTemplates,
        MockReply::ok(&vec![test_workout("tpl-1", "Intervals")]),
    );
    api
}

pub fn shared(api: &MockDashboardApi) -> SharedApi {
    Arc::new(api.clone())
}

// ========== Waiting ==========

/// Wait until the hook has settled with data or an error.
pub async fn settled<T, K>(hook: &QueryHook<T, K>) -> RequestState<T>
where
    T: Clone + Send + Sync + 'static,
    K: Clone + PartialEq + Send + 'static,
{
    let mut rx = hook.subscribe();
    let state = tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| !s.loading && (s.data.is_some() || s.error.is_some())),
    )
    .await
    .expect("query did not settle in time")
    .expect("query state dropped");
    (*state).clone()
}
