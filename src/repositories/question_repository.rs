use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{self, Database},
    errors::{AppError, AppResult},
    models::domain::{QuestionAnswer, QuizQuestion},
};

/// Questions and their answer options. Reads skip soft-deleted rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// Inserts a question together with its options in one transaction.
    async fn create_with_answers(
        &self,
        question: QuizQuestion,
        answers: Vec<QuestionAnswer>,
    ) -> AppResult<(QuizQuestion, Vec<QuestionAnswer>)>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizQuestion>>;
    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestion>>;
    async fn update(&self, question: QuizQuestion) -> AppResult<QuizQuestion>;
    async fn find_answers(&self, question_ids: &[String]) -> AppResult<Vec<QuestionAnswer>>;
    async fn find_answer(&self, id: &str) -> AppResult<Option<QuestionAnswer>>;
    async fn update_answer(&self, answer: QuestionAnswer) -> AppResult<QuestionAnswer>;
    /// Replaces several answers in one transaction.
    async fn update_answers(&self, answers: Vec<QuestionAnswer>) -> AppResult<Vec<QuestionAnswer>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuestionRepository {
    db: Database,
    questions: Collection<QuizQuestion>,
    answers: Collection<QuestionAnswer>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            db: db.clone(),
            questions: db.get_collection(db::QUIZ_QUESTIONS),
            answers: db.get_collection(db::QUESTION_ANSWERS),
        }
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn create_with_answers(
        &self,
        question: QuizQuestion,
        answers: Vec<QuestionAnswer>,
    ) -> AppResult<(QuizQuestion, Vec<QuestionAnswer>)> {
        let mut session = self.db.begin_transaction().await?;

        self.questions
            .insert_one(&question)
            .session(&mut session)
            .await?;
        if !answers.is_empty() {
            self.answers
                .insert_many(&answers)
                .session(&mut session)
                .await?;
        }

        session.commit_transaction().await?;
        Ok((question, answers))
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuizQuestion>> {
        let question = self
            .questions
            .find_one(doc! { "id": id, "is_deleted": false })
            .await?;
        Ok(question)
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<QuizQuestion>> {
        let questions: Vec<QuizQuestion> = self
            .questions
            .find(doc! { "quiz_id": quiz_id, "is_deleted": false })
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(questions)
    }

    async fn update(&self, question: QuizQuestion) -> AppResult<QuizQuestion> {
        let result = self
            .questions
            .replace_one(doc! { "id": question.id.as_str() }, &question)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                question.id
            )));
        }

        Ok(question)
    }

    async fn find_answers(&self, question_ids: &[String]) -> AppResult<Vec<QuestionAnswer>> {
        if question_ids.is_empty() {
            return Ok(Vec::new());
        }

        let answers: Vec<QuestionAnswer> = self
            .answers
            .find(doc! {
                "question_id": { "$in": question_ids.to_vec() },
                "is_deleted": false
            })
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(answers)
    }

    async fn find_answer(&self, id: &str) -> AppResult<Option<QuestionAnswer>> {
        let answer = self
            .answers
            .find_one(doc! { "id": id, "is_deleted": false })
            .await?;
        Ok(answer)
    }

    async fn update_answer(&self, answer: QuestionAnswer) -> AppResult<QuestionAnswer> {
        let result = self
            .answers
            .replace_one(doc! { "id": answer.id.as_str() }, &answer)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Answer with id '{}' not found",
                answer.id
            )));
        }

        Ok(answer)
    }

    async fn update_answers(&self, answers: Vec<QuestionAnswer>) -> AppResult<Vec<QuestionAnswer>> {
        let mut session = self.db.begin_transaction().await?;

        for answer in &answers {
            let result = self
                .answers
                .replace_one(doc! { "id": answer.id.as_str() }, answer)
                .session(&mut session)
                .await?;

            if result.matched_count == 0 {
                session.abort_transaction().await?;
                return Err(AppError::NotFound(format!(
                    "Answer with id '{}' not found",
                    answer.id
                )));
            }
        }

        session.commit_transaction().await?;
        Ok(answers)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let question_id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        let quiz_index = IndexModel::builder()
            .keys(doc! { "quiz_id": 1 })
            .options(IndexOptions::builder().name("quiz_id".to_string()).build())
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

        let question_index = IndexModel::builder()
            .keys(doc! { "question_id": 1 })
            .options(IndexOptions::builder().name("question_id".to_string()).build())
            .build();

        self.questions.create_index(question_id_index).await?;
        self.questions.create_index(quiz_index).await?;
        self.answers.create_index(answer_id_index).await?;
        self.answers.create_index(question_index).await?;

        log::info!("Created indexes for quiz_questions and question_answers collections");
        Ok(())
    }
}
