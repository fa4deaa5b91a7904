use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Material {
    pub id: String,
    pub title: String,
    pub description: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Material {
    pub fn new(title: &str, description: &str) -> Self {
        let now = Utc::now();
        Material {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: description.to_string(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentCategory {
    Video,
    Photo,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubMaterial {
    pub id: String,
    pub material_id: String,
    pub title: String,
    pub category: ContentCategory,
    /// External link or `/uploads/...` path.
    pub content: String,
    pub description: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubMaterial {
    pub fn new(
        material_id: &str,
        title: &str,
        category: ContentCategory,
        content: &str,
        description: &str,
    ) -> Self {
        let now = Utc::now();
        SubMaterial {
            id: Uuid::new_v4().to_string(),
            material_id: material_id.to_string(),
            title: title.to_string(),
            category,
            content: content.to_string(),
            description: description.to_string(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
