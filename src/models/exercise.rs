use serde::{Deserialize, Serialize};

use super::QueryParams;

/// An exercise from the catalog, or a user-defined one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub name: String,
    /// strength, cardio, plyometric or flexibility
    pub category: String,
    #[serde(default)]
    pub muscle_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default)]
    pub is_custom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
}

/// Filters for `GET /api/exercises`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExerciseFilters {
    pub category: Option<String>,
    pub muscle_group: Option<String>,
    pub search: Option<String>,
    pub include_custom: Option<bool>,
}

impl ExerciseFilters {
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_muscle_group(mut self, muscle_group: impl Into<String>) -> Self {
        self.muscle_group = Some(muscle_group.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_include_custom(mut self, include: bool) -> Self {
        self.include_custom = Some(include);
        self
    }

    /// Render as a query string (`?category=strength&...`), empty when no
    /// filter is set.
    pub fn to_query_string(&self) -> String {
        QueryParams::default()
            .push("category", self.category.as_deref())
            .push("muscle_group", self.muscle_group.as_deref())
            .push("search", self.search.as_deref())
            .push("include_custom", self.include_custom.map(|b| b.to_string()).as_deref())
            .finish()
    }
}
