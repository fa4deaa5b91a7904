use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{ContentCategory, SubMaterial},
        dto::{
            request::{CreateSubMaterialRequest, UpdateSubMaterialRequest},
            response::SubMaterialDto,
        },
    },
    repositories::{MaterialRepository, SubMaterialRepository},
    services::upload_service::{is_data_uri, UploadCategory, UploadService},
};

fn is_link(content: &str) -> bool {
    content.starts_with("http://") || content.starts_with("https://")
}

pub struct SubMaterialService {
    materials: Arc<dyn MaterialRepository>,
    sub_materials: Arc<dyn SubMaterialRepository>,
    uploads: Arc<UploadService>,
}

impl SubMaterialService {
    pub fn new(
        materials: Arc<dyn MaterialRepository>,
        sub_materials: Arc<dyn SubMaterialRepository>,
        uploads: Arc<UploadService>,
    ) -> Self {
        Self {
            materials,
            sub_materials,
            uploads,
        }
    }

    async fn ensure_material(&self, material_id: &str) -> AppResult<()> {
        match self.materials.find_by_id(material_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound(format!(
                "Material with id '{}' not found",
                material_id
            ))),
        }
    }

    pub(crate) async fn find_sub_material(&self, id: &str) -> AppResult<SubMaterial> {
        self.sub_materials
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Sub-material with id '{}' not found", id)))
    }

    /// Videos are links. Photos are links, stored upload paths, or data URIs to store.
    async fn resolve_content(&self, category: ContentCategory, content: String) -> AppResult<String> {
        match category {
            ContentCategory::Video if is_link(&content) => Ok(content),
            ContentCategory::Video => Err(AppError::ValidationError(
                "Video content must be an http(s) link".to_string(),
            )),
            ContentCategory::Photo if is_data_uri(&content) => {
                self.uploads.store(&content, UploadCategory::SubMaterials).await
            }
            ContentCategory::Photo if is_link(&content) || content.starts_with("/uploads/") => {
                Ok(content)
            }
            ContentCategory::Photo => Err(AppError::ValidationError(
                "Photo content must be a link or a base64 data URI".to_string(),
            )),
        }
    }

    pub async fn list_by_material(&self, material_id: &str) -> AppResult<Vec<SubMaterialDto>> {
        self.ensure_material(material_id).await?;
        let sub_materials = self.sub_materials.find_by_material(material_id).await?;
        Ok(sub_materials.into_iter().map(SubMaterialDto::from).collect())
    }

    pub async fn get_sub_material(&self, id: &str) -> AppResult<SubMaterialDto> {
        Ok(self.find_sub_material(id).await?.into())
    }

    pub async fn create_sub_material(
        &self,
        material_id: &str,
        request: CreateSubMaterialRequest,
    ) -> AppResult<SubMaterialDto> {
        request.validate()?;
        self.ensure_material(material_id).await?;

        let content = self
            .resolve_content(request.category, request.content)
            .await?;
        let sub_material = SubMaterial::new(
            material_id,
            &request.title,
            request.category,
            &content,
            &request.description,
        );
        let created = self.sub_materials.create(sub_material).await?;

        log::info!(
            "Created sub-material '{}' under material '{}'",
            created.id,
            material_id
        );
        Ok(created.into())
    }

    /// Changing the category re-checks the content against the new category.
    pub async fn update_sub_material(
        &self,
        id: &str,
        request: UpdateSubMaterialRequest,
    ) -> AppResult<SubMaterialDto> {
        request.validate()?;
        let mut sub_material = self.find_sub_material(id).await?;

        if let Some(title) = request.title {
            sub_material.title = title;
        }
        if let Some(description) = request.description {
            sub_material.description = description;
        }

        let category = request.category.unwrap_or(sub_material.category);
        if request.content.is_some() || category != sub_material.category {
            let content = request
                .content
                .unwrap_or_else(|| sub_material.content.clone());
            sub_material.content = self.resolve_content(category, content).await?;
            sub_material.category = category;
        }

        sub_material.touch();
        let updated = self.sub_materials.update(sub_material).await?;
        Ok(updated.into())
    }

    pub async fn delete_sub_material(&self, id: &str) -> AppResult<()> {
        let mut sub_material = self.find_sub_material(id).await?;
        sub_material.is_deleted = true;
        sub_material.touch();
        self.sub_materials.update(sub_material).await?;

        log::info!("Soft-deleted sub-material '{}'", id);
        Ok(())
    }
}
