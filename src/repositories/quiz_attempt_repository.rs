use std::collections::HashMap;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    ClientSession, Collection, IndexModel,
};

use crate::{
    db::{self, Database},
    errors::{AppError, AppResult},
    models::domain::{AttemptSummary, QuestionAnswer, QuizAttempt, QuizAttemptAnswer},
};

/// Unit of work for one quiz submission. Nothing written through it is visible
/// to other readers until `commit`; dropping it without committing discards
/// every write.
#[async_trait]
pub trait AttemptTransaction: Send {
    async fn insert_attempt(&mut self, attempt: &QuizAttempt) -> AppResult<()>;
    /// Correctness flag of every stored answer among `answer_ids`, keyed by id.
    async fn answer_keys(&mut self, answer_ids: &[String]) -> AppResult<HashMap<String, bool>>;
    async fn insert_answers(&mut self, answers: &[QuizAttemptAnswer]) -> AppResult<()>;
    /// Writes the final score and completion time onto the attempt row.
    async fn finalize(&mut self, attempt: &QuizAttempt) -> AppResult<()>;
    async fn commit(self: Box<Self>) -> AppResult<()>;
    async fn abort(self: Box<Self>) -> AppResult<()>;
}

#[async_trait]
pub trait QuizAttemptRepository: Send + Sync {
    async fn begin(&self) -> AppResult<Box<dyn AttemptTransaction>>;
    /// Every attempt joined with the student's display name, in insertion order.
    async fn find_all_summaries(&self) -> AppResult<Vec<AttemptSummary>>;
    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<QuizAttempt>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizAttemptRepository {
    db: Database,
    attempts: Collection<QuizAttempt>,
    attempt_answers: Collection<QuizAttemptAnswer>,
}

impl MongoQuizAttemptRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            attempts: db.get_collection(db::QUIZ_ATTEMPTS),
            attempt_answers: db.get_collection(db::QUIZ_ATTEMPT_ANSWERS),
        }
    }

    fn summary_pipeline() -> Vec<Document> {
        vec![
            doc! { "$sort": { "_id": 1 } },
            doc! {
                "$lookup": {
                    "from": db::USERS,
                    "localField": "student_id",
                    "foreignField": "id",
                    "as": "student"
                }
            },
            doc! { "$unwind": { "path": "$student", "preserveNullAndEmptyArrays": true } },
            doc! {
                "$project": {
                    "_id": 0,
                    "id": 1,
                    "student_id": 1,
                    "student_name": "$student.nama",
                    "quiz_name": 1,
                    "score": 1,
                    "finished_at": 1
                }
            },
        ]
    }
}

pub struct MongoAttemptTransaction {
    session: ClientSession,
    attempts: Collection<QuizAttempt>,
    attempt_answers: Collection<QuizAttemptAnswer>,
    answer_keys: Collection<QuestionAnswer>,
}

#[async_trait]
impl AttemptTransaction for MongoAttemptTransaction {
    async fn insert_attempt(&mut self, attempt: &QuizAttempt) -> AppResult<()> {
        self.attempts
            .insert_one(attempt)
            .session(&mut self.session)
            .await?;
        Ok(())
    }

    async fn answer_keys(&mut self, answer_ids: &[String]) -> AppResult<HashMap<String, bool>> {
        if answer_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut cursor = self
            .answer_keys
            .find(doc! { "id": { "$in": answer_ids.to_vec() } })
            .session(&mut self.session)
            .await?;

        let answers: Vec<QuestionAnswer> = cursor
            .stream(&mut self.session)
            .try_collect()
            .await?;

        Ok(answers
            .into_iter()
            .map(|answer| (answer.id, answer.is_correct))
            .collect())
    }

    async fn insert_answers(&mut self, answers: &[QuizAttemptAnswer]) -> AppResult<()> {
        if answers.is_empty() {
            return Ok(());
        }

        self.attempt_answers
            .insert_many(answers)
            .session(&mut self.session)
            .await?;
        Ok(())
    }

    async fn finalize(&mut self, attempt: &QuizAttempt) -> AppResult<()> {
        let result = self
            .attempts
            .replace_one(doc! { "id": attempt.id.as_str() }, attempt)
            .session(&mut self.session)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Attempt with id '{}' not found",
                attempt.id
            )));
        }
        Ok(())
    }

    async fn commit(mut self: Box<Self>) -> AppResult<()> {
        self.session.commit_transaction().await?;
        Ok(())
    }

    async fn abort(mut self: Box<Self>) -> AppResult<()> {
        self.session.abort_transaction().await?;
        Ok(())
    }
}

#[async_trait]
impl QuizAttemptRepository for MongoQuizAttemptRepository {
    async fn begin(&self) -> AppResult<Box<dyn AttemptTransaction>> {
        let session = self.db.begin_transaction().await?;
        Ok(Box::new(MongoAttemptTransaction {
            session,
            attempts: self.attempts.clone(),
            attempt_answers: self.attempt_answers.clone(),
            answer_keys: self.db.get_collection(db::QUESTION_ANSWERS),
        }))
    }

    async fn find_all_summaries(&self) -> AppResult<Vec<AttemptSummary>> {
        let summaries: Vec<AttemptSummary> = self
            .attempts
            .aggregate(Self::summary_pipeline())
            .with_type::<AttemptSummary>()
            .await?
            .try_collect()
            .await?;
        Ok(summaries)
    }

    async fn find_by_student(&self, student_id: &str) -> AppResult<Vec<QuizAttempt>> {
        let attempts: Vec<QuizAttempt> = self
            .attempts
            .find(doc! { "student_id": student_id })
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(attempts)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quiz_attempts collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let student_index = IndexModel::builder()
            .keys(doc! { "student_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("student_id".to_string())
                    .build(),
            )
            .build();

        let answer_id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let attempt_index = IndexModel::builder()
            .keys(doc! { "attempt_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("attempt_id".to_string())
                    .build(),
            )
            .build();

        self.attempts.create_index(id_index).await?;
        self.attempts.create_index(student_index).await?;
        self.attempt_answers.create_index(answer_id_index).await?;
        self.attempt_answers.create_index(attempt_index).await?;

        log::info!("Successfully created indexes for quiz_attempts collection");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_pipeline_joins_users_in_insertion_order() {
        let pipeline = MongoQuizAttemptRepository::summary_pipeline();

        assert_eq!(
            pipeline[0].get_document("$sort").unwrap(),
            &doc! { "_id": 1 }
        );
        let lookup = pipeline[1].get_document("$lookup").unwrap();
        assert_eq!(lookup.get_str("from").unwrap(), db::USERS);
        assert_eq!(lookup.get_str("foreignField").unwrap(), "id");
    }
}
