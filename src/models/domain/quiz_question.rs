use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Options every question is created with. Bulk answer edits must keep this count.
pub const ANSWER_OPTION_COUNT: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuizQuestion {
    pub id: String,
    pub quiz_id: String,
    pub question: String,
    pub photo: Option<String>,
    pub explanation: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuizQuestion {
    pub fn new(quiz_id: &str, question: &str, photo: Option<String>, explanation: &str) -> Self {
        let now = Utc::now();
        QuizQuestion {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz_id.to_string(),
            question: question.to_string(),
            photo,
            explanation: explanation.to_string(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QuestionAnswer {
    pub id: String,
    pub question_id: String,
    pub answer: String,
    pub is_correct: bool,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionAnswer {
    pub fn new(question_id: &str, answer: &str, is_correct: bool) -> Self {
        let now = Utc::now();
        QuestionAnswer {
            id: Uuid::new_v4().to_string(),
            question_id: question_id.to_string(),
            answer: answer.to_string(),
            is_correct,
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Placeholder options for a fresh question; the first one is marked correct.
    pub fn seed_for(question_id: &str) -> Vec<QuestionAnswer> {
        (1..=ANSWER_OPTION_COUNT)
            .map(|n| QuestionAnswer::new(question_id, &format!("Option {}", n), n == 1))
            .collect()
    }
}
