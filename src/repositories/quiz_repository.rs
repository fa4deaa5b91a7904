use async_trait::async_trait;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{self, Database},
    errors::{AppError, AppResult},
    models::domain::Quiz,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// The earliest-created non-deleted quiz.
    async fn find_current(&self) -> AppResult<Option<Quiz>>;
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn update(&self, quiz: Quiz) -> AppResult<Quiz>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuizRepository {
    collection: Collection<Quiz>,
}

impl MongoQuizRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(db::QUIZZES);
        Self { collection }
    }
}

#[async_trait]
impl QuizRepository for MongoQuizRepository {
    async fn find_current(&self) -> AppResult<Option<Quiz>> {
        let quiz = self
            .collection
            .find_one(doc! { "is_deleted": false })
            .sort(doc! { "_id": 1 })
            .await?;
        Ok(quiz)
    }

    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        self.collection.insert_one(&quiz).await?;
        Ok(quiz)
    }

    async fn update(&self, quiz: Quiz) -> AppResult<Quiz> {
        let result = self
            .collection
            .replace_one(doc! { "id": quiz.id.as_str() }, &quiz)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Quiz with id '{}' not found",
                quiz.id
            )));
        }

        Ok(quiz)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for quizzes collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;

        log::info!("Successfully created indexes for quizzes collection");
        Ok(())
    }
}
