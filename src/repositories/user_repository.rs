use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{self, Database},
    errors::{AppError, AppResult},
    models::domain::{Role, User},
};

/// Lookups only see active accounts; deactivated users are kept for history.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> AppResult<User>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    /// True when an active user other than `exclude_id` holds `username`.
    async fn username_taken(&self, username: &str, exclude_id: Option<String>) -> AppResult<bool>;
    async fn find_all(&self, role: Option<Role>) -> AppResult<Vec<User>>;
    async fn update(&self, user: User) -> AppResult<User>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(db::USERS);
        Self { collection }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        self.collection.insert_one(&user).await?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "id": id, "is_active": true })
            .await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "username": username, "is_active": true })
            .await?;
        Ok(user)
    }

    async fn username_taken(&self, username: &str, exclude_id: Option<String>) -> AppResult<bool> {
        let mut filter = doc! { "username": username, "is_active": true };
        if let Some(id) = exclude_id {
            filter.insert("id", doc! { "$ne": id });
        }

        let count = self.collection.count_documents(filter).await?;
        Ok(count > 0)
    }

    async fn find_all(&self, role: Option<Role>) -> AppResult<Vec<User>> {
        let mut filter = doc! { "is_active": true };
        if let Some(role) = role {
            filter.insert("role", role.as_str());
        }

        let users: Vec<User> = self
            .collection
            .find(filter)
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(users)
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let result = self
            .collection
            .replace_one(doc! { "id": user.id.as_str() }, &user)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "User with id '{}' not found",
                user.id
            )));
        }

        Ok(user)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();

        // Usernames of deactivated accounts may be reused.
        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .partial_filter_expression(doc! { "is_active": true })
                    .name("active_username_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(username_index).await?;
        log::info!("Created indexes for users collection");

        Ok(())
    }
}
