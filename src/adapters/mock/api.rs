//! Scripted dashboard API for testing.
//!
//! Each endpoint has a queue of replies consumed in order, plus an optional
//! default used once the queue is empty. Replies can be delayed so tests can
//! control the order in which concurrent calls settle.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::ApiError;
use crate::models::{
    Exercise, ExerciseFilters, HealthStatus, User, UserStats, WorkoutCreate, WorkoutFilters,
    WorkoutResponse, WorkoutSummary,
};
use crate::traits::DashboardApi;
use crate::util::lock;

/// The API operations that can be scripted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Health,
    CurrentUser,
    UserStats,
    Exercises,
    Exercise,
    Workouts,
    Workout,
    WorkoutTemplates,
    CreateWorkout,
    DeleteWorkout,
}

/// A scripted reply: a JSON payload or an error, delivered after `delay`.
#[derive(Debug, Clone)]
pub struct MockReply {
    result: Result<Value, ApiError>,
    delay: Duration,
}

impl MockReply {
    /// Reply successfully with `value`.
    pub fn ok<T: Serialize>(value: &T) -> Self {
        Self {
            result: Ok(serde_json::to_value(value).unwrap_or(Value::Null)),
            delay: Duration::ZERO,
        }
    }

    /// Reply with an error.
    pub fn err(error: ApiError) -> Self {
        Self {
            result: Err(error),
            delay: Duration::ZERO,
        }
    }

    /// Delay the reply.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// A recorded call for verification in tests.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub endpoint: Endpoint,
    /// Path argument or rendered query string, if any
    pub argument: Option<String>,
}

#[derive(Debug, Default)]
struct Script {
    queue: VecDeque<MockReply>,
    default: Option<MockReply>,
}

/// Scripted [`DashboardApi`] implementation.
///
/// Unscripted endpoints fail with [`ApiError::ServiceUnavailable`].
///
/// # Example
///
/// ```ignore
/// use velocollab::adapters::mock::{Endpoint, MockDashboardApi, MockReply};
///
/// let api = MockDashboardApi::new();
/// api.push(Endpoint::CurrentUser, MockReply::ok(&user));
/// api.push(Endpoint::CurrentUser, MockReply::err(ApiError::AuthenticationRequired));
///
/// assert!(api.current_user().await.is_ok());
/// assert!(api.current_user().await.is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockDashboardApi {
    scripts: Arc<Mutex<HashMap<Endpoint, Script>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockDashboardApi {
    /// Create a mock with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply for the next call to `endpoint`.
    pub fn push(&self, endpoint: Endpoint, reply: MockReply) -> &Self {
        lock(&self.scripts)
            .entry(endpoint)
            .or_default()
            .queue
            .push_back(reply);
        self
    }

    /// Reply used when the queue for `endpoint` is empty.
    pub fn set_default(&self, endpoint: Endpoint, reply: MockReply) -> &Self {
        lock(&self.scripts).entry(endpoint).or_default().default = Some(reply);
        self
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Number of calls made to `endpoint`.
    pub fn call_count(&self, endpoint: Endpoint) -> usize {
        lock(&self.calls)
            .iter()
            .filter(|call| call.endpoint == endpoint)
            .count()
    }

    async fn respond<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        argument: Option<String>,
    ) -> Result<T, ApiError> {
        lock(&self.calls).push(RecordedCall { endpoint, argument });

        let reply = {
            let mut scripts = lock(&self.scripts);
            scripts
                .get_mut(&endpoint)
                .and_then(|script| script.queue.pop_front().or_else(|| script.default.clone()))
        };

        let Some(reply) = reply else {
            return Err(ApiError::ServiceUnavailable);
        };

        if !reply.delay.is_zero() {
            tokio::time::sleep(reply.delay).await;
        }

        let value = reply.result?;
        serde_json::from_value(value).map_err(|e| ApiError::Unknown {
            status: 200,
            message: Some(format!("Invalid mock payload for {:?}: {}", endpoint, e)),
        })
    }
}

#[async_trait]
impl DashboardApi for MockDashboardApi {
    async fn health_check(&self) -> Result<HealthStatus, ApiError> {
        self.respond(Endpoint::Health, None).await
    }

    async fn current_user(&self) -> Result<User, ApiError> {
        self.respond(Endpoint::CurrentUser, None).await
    }

    async fn user_stats(&self) -> Result<UserStats, ApiError> {
        self.respond(Endpoint::UserStats, None).await
    }

    async fn exercises(&self, filters: Option<ExerciseFilters>) -> Result<Vec<Exercise>, ApiError> {
        let query = filters.map(|f| f.to_query_string());
        self.respond(Endpoint::Exercises, query).await
    }

    async fn exercise(&self, exercise_id: &str) -> Result<Exercise, ApiError> {
        self.respond(Endpoint::Exercise, Some(exercise_id.to_string()))
            .await
    }

    async fn workouts(
        &self,
        filters: Option<WorkoutFilters>,
    ) -> Result<Vec<WorkoutSummary>, ApiError> {
        let query = filters.map(|f| f.to_query_string());
        self.respond(Endpoint::Workouts, query).await
    }

    async fn workout(&self, workout_id: &str) -> Result<WorkoutResponse, ApiError> {
        self.respond(Endpoint::Workout, Some(workout_id.to_string()))
            .await
    }

    async fn workout_templates(&self) -> Result<Vec<WorkoutResponse>, ApiError> {
        self.respond(Endpoint::WorkoutTemplates, None).await
    }

    async fn create_workout(&self, workout: WorkoutCreate) -> Result<WorkoutResponse, ApiError> {
        self.respond(Endpoint::CreateWorkout, Some(workout.name))
            .await
    }

    async fn delete_workout(&self, workout_id: &str) -> Result<(), ApiError> {
        self.respond(Endpoint::DeleteWorkout, Some(workout_id.to_string()))
            .await
    }
}
