use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_QUIZ_TITLE: &str = "Quiz";
pub const DEFAULT_QUIZ_DURATION: i32 = 30;

/// The single quiz of the platform. Retrieval takes the earliest-created
/// non-deleted row.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Quiz {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: i32, // minutes
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quiz {
    pub fn new(title: &str, description: &str, duration: i32, is_active: bool) -> Self {
        let now = Utc::now();
        Quiz {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            duration,
            is_active,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Quiz {
    fn default() -> Self {
        Quiz::new(DEFAULT_QUIZ_TITLE, "", DEFAULT_QUIZ_DURATION, false)
    }
}
