use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user profile as returned by `GET /api/users/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub total_workouts: u32,
    #[serde(default)]
    pub current_streak: u32,
}

/// An exercise the user performs most often.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteExercise {
    pub name: String,
    pub count: u32,
}

/// A personal record entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalRecord {
    pub exercise: String,
    pub value: String,
    pub date: String,
}

/// Aggregate workout statistics for the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_workouts: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_duration_hours: f64,
    #[serde(default)]
    pub favorite_exercises: Vec<FavoriteExercise>,
    #[serde(default)]
    pub recent_prs: Vec<PersonalRecord>,
}
