use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A student finished viewing a sub-material.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Progress {
    pub id: String,
    pub student_id: String,
    pub sub_material_id: String,
    pub created_at: DateTime<Utc>,
}

impl Progress {
    pub fn new(student_id: &str, sub_material_id: &str) -> Self {
        Progress {
            id: Uuid::new_v4().to_string(),
            student_id: student_id.to_string(),
            sub_material_id: sub_material_id.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Counts behind the quiz gate: non-deleted sub-materials against those the
/// student has completed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompletionCounts {
    pub done: i64,
    pub total: i64,
}

impl CompletionCounts {
    pub fn is_complete(&self) -> bool {
        self.done >= self.total
    }
}
