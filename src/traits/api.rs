//! Dashboard API transport trait.
//!
//! The wire transport (HTTP, response parsing, status classification) lives
//! outside this crate. Hooks only need something that eventually yields a
//! typed value or an [`ApiError`].

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{
    Exercise, ExerciseFilters, HealthStatus, User, UserStats, WorkoutCreate, WorkoutFilters,
    WorkoutResponse, WorkoutSummary,
};

/// Remote calls made by the dashboard.
#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// `GET /health`
    async fn health_check(&self) -> Result<HealthStatus, ApiError>;

    /// `GET /api/users/me`
    async fn current_user(&self) -> Result<User, ApiError>;

    /// `GET /api/users/me/stats`
    async fn user_stats(&self) -> Result<UserStats, ApiError>;

    /// `GET /api/exercises` with optional filters.
    async fn exercises(&self, filters: Option<ExerciseFilters>) -> Result<Vec<Exercise>, ApiError>;

    /// `GET /api/exercises/{id}`
    async fn exercise(&self, exercise_id: &str) -> Result<Exercise, ApiError>;

    /// `GET /api/workouts` with optional filters.
    async fn workouts(
        &self,
        filters: Option<WorkoutFilters>,
    ) -> Result<Vec<WorkoutSummary>, ApiError>;

    /// `GET /api/workouts/{id}`
    async fn workout(&self, workout_id: &str) -> Result<WorkoutResponse, ApiError>;

    /// `GET /api/workout-templates`
    async fn workout_templates(&self) -> Result<Vec<WorkoutResponse>, ApiError>;

    /// `POST /api/workouts`
    async fn create_workout(&self, workout: WorkoutCreate) -> Result<WorkoutResponse, ApiError>;

    /// `DELETE /api/workouts/{id}`
    async fn delete_workout(&self, workout_id: &str) -> Result<(), ApiError>;
}
