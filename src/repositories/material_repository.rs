use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{self, Database},
    errors::{AppError, AppResult},
    models::domain::Material,
};

/// Reads skip soft-deleted materials.
#[async_trait]
pub trait MaterialRepository: Send + Sync {
    async fn create(&self, material: Material) -> AppResult<Material>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Material>>;
    async fn find_all(&self) -> AppResult<Vec<Material>>;
    async fn update(&self, material: Material) -> AppResult<Material>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoMaterialRepository {
    collection: Collection<Material>,
}

impl MongoMaterialRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(db::MATERIALS);
        Self { collection }
    }
}

#[async_trait]
impl MaterialRepository for MongoMaterialRepository {
    async fn create(&self, material: Material) -> AppResult<Material> {
        self.collection.insert_one(&material).await?;
        Ok(material)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Material>> {
        let material = self
            .collection
            .find_one(doc! { "id": id, "is_deleted": false })
            .await?;
        Ok(material)
    }

    async fn find_all(&self) -> AppResult<Vec<Material>> {
        let materials: Vec<Material> = self
            .collection
            .find(doc! { "is_deleted": false })
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(materials)
    }

    async fn update(&self, material: Material) -> AppResult<Material> {
        let result = self
            .collection
            .replace_one(doc! { "id": material.id.as_str() }, &material)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Material with id '{}' not found",
                material.id
            )));
        }

        Ok(material)
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

        self.collection.create_index(id_index).await?;
        log::info!("Created indexes for materials collection");
        Ok(())
    }
}
