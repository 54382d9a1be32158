//! Payload types exchanged with the dashboard API.

mod exercise;
mod health;
mod user;
mod workout;

pub use exercise::{Exercise, ExerciseFilters};
pub use health::HealthStatus;
pub use user::{FavoriteExercise, PersonalRecord, User, UserStats};
pub use workout::{
    WorkoutCreate, WorkoutExercise, WorkoutExerciseSet, WorkoutFilters, WorkoutResponse,
    WorkoutSummary,
};

/// Builds `?key=value&...` strings, skipping unset values.
///
/// Keys and values are percent-encoded.
#[derive(Debug, Default)]
struct QueryParams {
    pairs: Vec<String>,
}

impl QueryParams {
    fn push(mut self, key: &str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.pairs.push(format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(value)
            ));
        }
        self
    }

    fn finish(self) -> String {
        if self.pairs.is_empty() {
            String::new()
        } else {
            format!("?{}", self.pairs.join("&"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_filters_render_nothing() {
        assert_eq!(ExerciseFilters::default().to_query_string(), "");
        assert_eq!(WorkoutFilters::default().to_query_string(), "");
    }

    #[test]
    fn test_exercise_filters_query_string() {
        let filters = ExerciseFilters::default()
            .with_category("strength")
            .with_include_custom(false);
        assert_eq!(
            filters.to_query_string(),
            "?category=strength&include_custom=false"
        );
    }

    #[test]
    fn test_empty_string_values_are_skipped() {
        let filters = ExerciseFilters::default().with_search("");
        assert_eq!(filters.to_query_string(), "");
    }

    #[test]
    fn test_reserved_characters_are_encoded() {
        let filters = ExerciseFilters::default()
            .with_search("bench & press=1")
            .with_muscle_group("upper/back");
        assert_eq!(
            filters.to_query_string(),
            "?muscle_group=upper%2Fback&search=bench%20%26%20press%3D1"
        );
    }

    #[test]
    fn test_workout_filters_query_string() {
        let filters = WorkoutFilters::default().with_status("completed").with_limit(5);
        assert_eq!(filters.to_query_string(), "?status=completed&limit=5");
    }

    #[test]
    fn test_user_deserializes_with_defaults() {
        let json = r#"{
            "id": "user-1",
            "name": "Ada",
            "email": "ada@example.com",
            "created_at": "2024-01-01T00:00:00Z"
        }"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.total_workouts, 0);
        assert!(user.avatar_url.is_none());
    }

    #[test]
    fn test_workout_create_skips_unset_fields() {
        let body = serde_json::to_value(WorkoutCreate::new("Leg day")).unwrap();
        assert_eq!(body, serde_json::json!({ "name": "Leg day" }));
    }

    #[test]
    fn test_health_status() {
        let health = HealthStatus {
            status: "healthy".to_string(),
            version: "1.0.0".to_string(),
            timestamp: None,
        };
        assert!(health.is_healthy());

        let parsed: HealthStatus =
            serde_json::from_str(r#"{"status": "degraded", "version": "1.0.0"}"#).unwrap();
        assert!(!parsed.is_healthy());
        assert!(parsed.timestamp.is_none());
    }
}
