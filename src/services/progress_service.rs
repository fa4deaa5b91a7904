use std::sync::Arc;

use crate::{
    auth::Principal,
    errors::{AppError, AppResult},
    models::{
        domain::{CompletionCounts, Progress},
        dto::response::{ProgressDto, ProgressSummaryDto},
    },
    repositories::{ProgressRepository, SubMaterialRepository},
};

pub struct ProgressService {
    progress: Arc<dyn ProgressRepository>,
    sub_materials: Arc<dyn SubMaterialRepository>,
}

impl ProgressService {
    pub fn new(
        progress: Arc<dyn ProgressRepository>,
        sub_materials: Arc<dyn SubMaterialRepository>,
    ) -> Self {
        Self {
            progress,
            sub_materials,
        }
    }

    /// Records that the student finished a sub-material. Repeating the call
    /// returns the existing record.
    pub async fn mark_complete(
        &self,
        principal: &Principal,
        sub_material_id: &str,
    ) -> AppResult<ProgressDto> {
        if self.sub_materials.find_by_id(sub_material_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Sub-material with id '{}' not found",
                sub_material_id
            )));
        }

        if let Some(existing) = self.progress.find(&principal.id, sub_material_id).await? {
            return Ok(existing.into());
        }

        match self
            .progress
            .create(Progress::new(&principal.id, sub_material_id))
            .await
        {
            Ok(created) => {
                log::info!(
                    "Student '{}' completed sub-material '{}'",
                    principal.id,
                    sub_material_id
                );
                Ok(created.into())
            }
            // Lost a race against a concurrent request for the same pair.
            Err(AppError::AlreadyExists(_)) => self
                .progress
                .find(&principal.id, sub_material_id)
                .await?
                .map(ProgressDto::from)
                .ok_or_else(|| AppError::InternalError("Progress record vanished".to_string())),
            Err(e) => Err(e),
        }
    }

    pub async fn summary(&self, principal: &Principal) -> AppResult<ProgressSummaryDto> {
        let counts = self.progress.completion_counts(&principal.id).await?;
        Ok(counts.into())
    }

    /// Fails with Forbidden carrying "(done/total)" until every non-deleted
    /// sub-material has been completed.
    pub async fn ensure_quiz_unlocked(&self, principal: &Principal) -> AppResult<CompletionCounts> {
        let counts = self.progress.completion_counts(&principal.id).await?;

        if !counts.is_complete() {
            log::warn!(
                "Quiz locked for student '{}' ({}/{})",
                principal.id,
                counts.done,
                counts.total
            );
            return Err(AppError::Forbidden(format!(
                "Complete all materials before taking the quiz ({}/{})",
                counts.done, counts.total
            )));
        }

        Ok(counts)
    }
}
