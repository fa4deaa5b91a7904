use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::{
    db::{self, Database},
    errors::AppResult,
    models::domain::{CompletionCounts, Progress, SubMaterial},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProgressRepository: Send + Sync {
    async fn create(&self, progress: Progress) -> AppResult<Progress>;
    async fn find(&self, student_id: &str, sub_material_id: &str) -> AppResult<Option<Progress>>;
    async fn completed_sub_material_ids(&self, student_id: &str) -> AppResult<Vec<String>>;
    /// Non-deleted sub-materials of non-deleted materials against the distinct ones
    /// the student completed, read in a single query.
    async fn completion_counts(&self, student_id: &str) -> AppResult<CompletionCounts>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoProgressRepository {
    collection: Collection<Progress>,
    sub_materials: Collection<SubMaterial>,
}

impl MongoProgressRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.get_collection(db::PROGRESS),
            sub_materials: db.get_collection(db::SUB_MATERIALS),
        }
    }

    fn completion_pipeline(student_id: &str) -> Vec<Document> {
        vec![
            doc! { "$match": { "is_deleted": false } },
            doc! {
                "$lookup": {
                    "from": db::MATERIALS,
                    "let": { "material_id": "$material_id" },
                    "pipeline": [
                        { "$match": { "$expr": { "$and": [
                            { "$eq": ["$id", "$$material_id"] },
                            { "$eq": ["$is_deleted", false] }
                        ] } } },
                        { "$limit": 1 }
                    ],
                    "as": "material"
                }
            },
            // Sub-materials of a deleted material no longer count.
            doc! { "$match": { "material": { "$ne": [] } } },
            doc! {
                "$lookup": {
                    "from": db::PROGRESS,
                    "let": { "sub_material_id": "$id" },
                    "pipeline": [
                        { "$match": { "$expr": { "$and": [
                            { "$eq": ["$sub_material_id", "$$sub_material_id"] },
                            { "$eq": ["$student_id", student_id] }
                        ] } } },
                        { "$limit": 1 }
                    ],
                    "as": "completed"
                }
            },
            doc! {
                "$group": {
                    "_id": null,
                    "total": { "$sum": 1 },
                    "done": { "$sum": {
                        "$cond": [{ "$gt": [{ "$size": "$completed" }, 0] }, 1, 0]
                    } }
                }
            },
            doc! { "$project": { "_id": 0, "total": 1, "done": 1 } },
        ]
    }
}

#[async_trait]
impl ProgressRepository for MongoProgressRepository {
    async fn create(&self, progress: Progress) -> AppResult<Progress> {
        self.collection.insert_one(&progress).await?;
        Ok(progress)
    }

    async fn find(&self, student_id: &str, sub_material_id: &str) -> AppResult<Option<Progress>> {
        let progress = self
            .collection
            .find_one(doc! { "student_id": student_id, "sub_material_id": sub_material_id })
            .await?;
        Ok(progress)
    }

    async fn completed_sub_material_ids(&self, student_id: &str) -> AppResult<Vec<String>> {
        let records: Vec<Progress> = self
            .collection
            .find(doc! { "student_id": student_id })
            .await?
            .try_collect()
            .await?;
        Ok(records.into_iter().map(|p| p.sub_material_id).collect())
    }

    async fn completion_counts(&self, student_id: &str) -> AppResult<CompletionCounts> {
        let mut cursor = self
            .sub_materials
            .aggregate(Self::completion_pipeline(student_id))
            .with_type::<CompletionCounts>()
            .await?;

        // No sub-materials at all yields no group document.
        Ok(cursor.try_next().await?.unwrap_or_default())
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

        let student_sub_material_index = IndexModel::builder()
            .keys(doc! { "student_id": 1, "sub_material_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("student_sub_material_unique".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(student_sub_material_index).await?;
        log::info!("Created indexes for progress collection");
        Ok(())
    }
}
