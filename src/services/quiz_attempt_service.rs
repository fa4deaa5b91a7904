use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use chrono::Utc;
use validator::Validate;

use crate::{
    auth::Principal,
    errors::{AppError, AppResult},
    models::{
        domain::{Quiz, QuizAttempt, QuizAttemptAnswer},
        dto::{
            request::{SubmitQuizRequest, SubmittedAnswer},
            response::{AttemptResultDto, StudentAttemptDto, SubmitQuizResponse},
        },
    },
    repositories::{AttemptTransaction, QuizAttemptRepository, QuizRepository},
};

/// Percentage of correct answers, rounded down. An empty submission scores 0.
pub fn compute_score(correct: usize, total: usize) -> i32 {
    if total == 0 {
        return 0;
    }
    ((correct * 100) / total) as i32
}

/// Distinct non-null answer ids, in submission order.
fn selected_answer_ids(submitted: &[SubmittedAnswer]) -> Vec<String> {
    let mut seen = HashSet::new();
    submitted
        .iter()
        .filter_map(|item| item.answer_id.clone())
        .filter(|id| seen.insert(id.clone()))
        .collect()
}

/// One attempt answer per submitted pair. A selection counts only when it
/// resolves to a stored answer; unknown ids are recorded as unanswered.
pub fn grade_answers(
    attempt_id: &str,
    submitted: &[SubmittedAnswer],
    answer_keys: &HashMap<String, bool>,
) -> Vec<QuizAttemptAnswer> {
    submitted
        .iter()
        .map(|item| {
            let resolved = item
                .answer_id
                .as_ref()
                .and_then(|id| answer_keys.get(id).map(|correct| (id.clone(), *correct)));

            match resolved {
                Some((answer_id, is_correct)) => {
                    QuizAttemptAnswer::new(attempt_id, &item.question_id, Some(answer_id), is_correct)
                }
                None => QuizAttemptAnswer::new(attempt_id, &item.question_id, None, false),
            }
        })
        .collect()
}

pub struct QuizAttemptService {
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn QuizAttemptRepository>,
}

impl QuizAttemptService {
    pub fn new(quizzes: Arc<dyn QuizRepository>, attempts: Arc<dyn QuizAttemptRepository>) -> Self {
        Self { quizzes, attempts }
    }

    async fn record_attempt(
        tx: &mut dyn AttemptTransaction,
        quiz: &Quiz,
        student_id: &str,
        submitted: &[SubmittedAnswer],
    ) -> AppResult<QuizAttempt> {
        let mut attempt = QuizAttempt::start(quiz, student_id);
        tx.insert_attempt(&attempt).await?;

        let answer_keys = tx.answer_keys(&selected_answer_ids(submitted)).await?;
        let answers = grade_answers(&attempt.id, submitted, &answer_keys);
        tx.insert_answers(&answers).await?;

        let correct = answers.iter().filter(|a| a.is_correct).count();
        let now = Utc::now();
        attempt.score = compute_score(correct, answers.len());
        attempt.finished_at = Some(now);
        attempt.updated_at = now;
        tx.finalize(&attempt).await?;

        Ok(attempt)
    }

    /// Grades and stores a submission atomically. Any failing step rolls back
    /// the whole attempt.
    pub async fn submit(
        &self,
        principal: &Principal,
        request: SubmitQuizRequest,
    ) -> AppResult<SubmitQuizResponse> {
        request.validate()?;

        let quiz = self
            .quizzes
            .find_current()
            .await?
            .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))?;

        let mut tx = self.attempts.begin().await?;

        match Self::record_attempt(tx.as_mut(), &quiz, &principal.id, &request.result).await {
            Ok(attempt) => {
                tx.commit().await.map_err(|e| {
                    log::error!("Committing quiz attempt failed: {}", e);
                    AppError::InternalError("Failed to submit quiz".to_string())
                })?;

                log::info!(
                    "Student '{}' submitted attempt '{}' with score {}",
                    principal.id,
                    attempt.id,
                    attempt.score
                );
                Ok(attempt.into())
            }
            Err(e) => {
                log::error!("Quiz submission for '{}' failed: {}", principal.id, e);
                if let Err(abort_err) = tx.abort().await {
                    log::error!("Aborting quiz submission failed: {}", abort_err);
                }
                Err(AppError::InternalError("Failed to submit quiz".to_string()))
            }
        }
    }

    pub async fn history_all(&self) -> AppResult<Vec<AttemptResultDto>> {
        let summaries = self.attempts.find_all_summaries().await?;
        Ok(summaries.into_iter().map(AttemptResultDto::from).collect())
    }

    pub async fn history_for_student(&self, principal: &Principal) -> AppResult<Vec<StudentAttemptDto>> {
        let attempts = self.attempts.find_by_student(&principal.id).await?;
        Ok(attempts.into_iter().map(StudentAttemptDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(question_id: &str, answer_id: Option<&str>) -> SubmittedAnswer {
        SubmittedAnswer {
            question_id: question_id.to_string(),
            answer_id: answer_id.map(str::to_string),
        }
    }

    #[test]
    fn test_score_rounds_down() {
        assert_eq!(compute_score(3, 4), 75);
        assert_eq!(compute_score(2, 3), 66);
        assert_eq!(compute_score(1, 3), 33);
        assert_eq!(compute_score(4, 4), 100);
    }

    #[test]
    fn test_score_of_empty_submission_is_zero() {
        assert_eq!(compute_score(0, 0), 0);
    }

    #[test]
    fn test_grade_unknown_and_missing_answers() {
        let keys = HashMap::from([("a-right".to_string(), true), ("a-wrong".to_string(), false)]);
        let submitted = vec![
            pair("q1", Some("a-right")),
            pair("q2", Some("a-wrong")),
            pair("q3", Some("a-ghost")),
            pair("q4", None),
        ];

        let graded = grade_answers("attempt-1", &submitted, &keys);

        assert_eq!(graded.len(), 4);
        assert!(graded.iter().all(|a| a.attempt_id == "attempt-1"));
        assert!(graded[0].is_correct);
        assert_eq!(graded[0].selected_answer_id.as_deref(), Some("a-right"));
        assert!(!graded[1].is_correct);
        assert_eq!(graded[1].selected_answer_id.as_deref(), Some("a-wrong"));
        assert!(!graded[2].is_correct);
        assert_eq!(graded[2].selected_answer_id, None);
        assert!(!graded[3].is_correct);
        assert_eq!(graded[3].selected_answer_id, None);
    }

    #[test]
    fn test_selected_answer_ids_are_distinct() {
        let submitted = vec![
            pair("q1", Some("a1")),
            pair("q2", None),
            pair("q3", Some("a1")),
            pair("q4", Some("a2")),
        ];
        assert_eq!(selected_answer_ids(&submitted), vec!["a1", "a2"]);
    }
}
