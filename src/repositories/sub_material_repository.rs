use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::IndexOptions, Collection, IndexModel};

use crate::{
    db::{self, Database},
    errors::{AppError, AppResult},
    models::domain::SubMaterial,
};

/// Lookups filter on the sub-material's own deleted flag only, so a
/// sub-material stays reachable by id after its material is deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubMaterialRepository: Send + Sync {
    async fn create(&self, sub_material: SubMaterial) -> AppResult<SubMaterial>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<SubMaterial>>;
    async fn find_by_material(&self, material_id: &str) -> AppResult<Vec<SubMaterial>>;
    async fn update(&self, sub_material: SubMaterial) -> AppResult<SubMaterial>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoSubMaterialRepository {
    collection: Collection<SubMaterial>,
}

impl MongoSubMaterialRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection(db::SUB_MATERIALS);
        Self { collection }
    }
}

#[async_trait]
impl SubMaterialRepository for MongoSubMaterialRepository {
    async fn create(&self, sub_material: SubMaterial) -> AppResult<SubMaterial> {
        self.collection.insert_one(&sub_material).await?;
        Ok(sub_material)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<SubMaterial>> {
        let sub_material = self
            .collection
            .find_one(doc! { "id": id, "is_deleted": false })
            .await?;
        Ok(sub_material)
    }

    async fn find_by_material(&self, material_id: &str) -> AppResult<Vec<SubMaterial>> {
        let items: Vec<SubMaterial> = self
            .collection
            .find(doc! { "material_id": material_id, "is_deleted": false })
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(items)
    }

    async fn update(&self, sub_material: SubMaterial) -> AppResult<SubMaterial> {
        let result = self
            .collection
            .replace_one(doc! { "id": sub_material.id.as_str() }, &sub_material)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Sub-material with id '{}' not found",
                sub_material.id
            )));
        }

        Ok(sub_material)
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

        let material_index = IndexModel::builder()
            .keys(doc! { "material_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("material_id".to_string())
                    .build(),
            )
            .build();

        self.collection.create_index(id_index).await?;
        self.collection.create_index(material_index).await?;
        log::info!("Created indexes for sub_materials collection");
        Ok(())
    }
}
