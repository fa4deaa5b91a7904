use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::Quiz;

/// One submission of the quiz. The quiz name and description are copied so the
/// record reads the same after the quiz is edited.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub student_id: String,
    pub quiz_name: String,
    pub quiz_description: String,
    pub score: i32,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuizAttempt {
    pub fn start(quiz: &Quiz, student_id: &str) -> Self {
        let now = Utc::now();
        QuizAttempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz.id.clone(),
            student_id: student_id.to_string(),
            quiz_name: quiz.title.clone(),
            quiz_description: quiz.description.clone(),
            score: 0,
            finished_at: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// The answer given to one question of an attempt. `is_correct` is frozen at
/// submission time.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizAttemptAnswer {
    pub id: String,
    pub attempt_id: String,
    pub question_id: String,
    pub selected_answer_id: Option<String>,
    pub is_correct: bool,
    pub created_at: DateTime<Utc>,
}

impl QuizAttemptAnswer {
    pub fn new(
        attempt_id: &str,
        question_id: &str,
        selected_answer_id: Option<String>,
        is_correct: bool,
    ) -> Self {
        QuizAttemptAnswer {
            id: Uuid::new_v4().to_string(),
            attempt_id: attempt_id.to_string(),
            question_id: question_id.to_string(),
            selected_answer_id,
            is_correct,
            created_at: Utc::now(),
        }
    }
}

/// Attempt joined with the student's display name, for the teacher's result list.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct AttemptSummary {
    pub id: String,
    pub student_id: String,
    pub student_name: Option<String>,
    pub quiz_name: String,
    pub score: i32,
    pub finished_at: Option<DateTime<Utc>>,
}
