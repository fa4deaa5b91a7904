use std::{collections::HashSet, sync::Arc};

use validator::Validate;

use crate::{
    auth::Principal,
    errors::{AppError, AppResult},
    models::{
        domain::Material,
        dto::{
            request::{CreateMaterialRequest, UpdateMaterialRequest},
            response::{
                MaterialDetailDto, MaterialDto, StudentMaterialDetailDto, StudentSubMaterialDto,
                SubMaterialDto,
            },
        },
    },
    repositories::{MaterialRepository, ProgressRepository, SubMaterialRepository},
};

pub struct MaterialService {
    materials: Arc<dyn MaterialRepository>,
    sub_materials: Arc<dyn SubMaterialRepository>,
    progress: Arc<dyn ProgressRepository>,
}

impl MaterialService {
    pub fn new(
        materials: Arc<dyn MaterialRepository>,
        sub_materials: Arc<dyn SubMaterialRepository>,
        progress: Arc<dyn ProgressRepository>,
    ) -> Self {
        Self {
            materials,
            sub_materials,
            progress,
        }
    }

    pub(crate) async fn find_material(&self, id: &str) -> AppResult<Material> {
        self.materials
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Material with id '{}' not found", id)))
    }

    pub async fn list_materials(&self) -> AppResult<Vec<MaterialDto>> {
        let materials = self.materials.find_all().await?;
        Ok(materials.into_iter().map(MaterialDto::from).collect())
    }

    pub async fn get_material(&self, id: &str) -> AppResult<MaterialDetailDto> {
        let material = self.find_material(id).await?;
        let sub_materials = self.sub_materials.find_by_material(&material.id).await?;

        Ok(MaterialDetailDto {
            material: material.into(),
            sub_materials: sub_materials.into_iter().map(SubMaterialDto::from).collect(),
        })
    }

    /// Material detail with each sub-material flagged as completed or not for the caller.
    pub async fn get_material_for_student(
        &self,
        id: &str,
        principal: &Principal,
    ) -> AppResult<StudentMaterialDetailDto> {
        let material = self.find_material(id).await?;
        let sub_materials = self.sub_materials.find_by_material(&material.id).await?;
        let completed: HashSet<String> = self
            .progress
            .completed_sub_material_ids(&principal.id)
            .await?
            .into_iter()
            .collect();

        Ok(StudentMaterialDetailDto {
            material: material.into(),
            sub_materials: sub_materials
                .into_iter()
                .map(|sub_material| StudentSubMaterialDto {
                    completed: completed.contains(&sub_material.id),
                    sub_material: sub_material.into(),
                })
                .collect(),
        })
    }

    pub async fn create_material(&self, request: CreateMaterialRequest) -> AppResult<MaterialDto> {
        request.validate()?;

        let material = Material::new(&request.title, &request.description);
        let created = self.materials.create(material).await?;

        log::info!("Created material '{}'", created.id);
        Ok(created.into())
    }

    pub async fn update_material(
        &self,
        id: &str,
        request: UpdateMaterialRequest,
    ) -> AppResult<MaterialDto> {
        request.validate()?;
        let mut material = self.find_material(id).await?;

        if let Some(title) = request.title {
            material.title = title;
        }
        if let Some(description) = request.description {
            material.description = description;
        }

        material.touch();
        let updated = self.materials.update(material).await?;
        Ok(updated.into())
    }

    /// Soft delete. Sub-materials keep their own flag and stay reachable by id.
    pub async fn delete_material(&self, id: &str) -> AppResult<()> {
        let mut material = self.find_material(id).await?;
        material.is_deleted = true;
        material.touch();
        self.materials.update(material).await?;

        log::info!("Soft-deleted material '{}'", id);
        Ok(())
    }
}
