use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// A stored post with its references as bare ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "desc")]
    pub description: Option<String>,
    #[sqlx(rename = "file_id")]
    pub file: Option<Uuid>,
    #[sqlx(rename = "category_id")]
    pub category: Uuid,
    pub updated_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// New post with a time-ordered id, so id order is creation order.
    pub fn new(
        title: String,
        description: Option<String>,
        file: Option<Uuid>,
        category: Uuid,
        updated_by: Uuid,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title,
            description,
            file,
            category,
            updated_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Value of the foreign-key column `column`, if the post has one.
    pub fn reference(&self, column: &str) -> Option<Uuid> {
        match column {
            "file_id" => self.file,
            "category_id" => Some(self.category),
            "updated_by" => Some(self.updated_by),
            _ => None,
        }
    }
}

/// A post with `file`, `category` and `updatedBy` replaced by the referenced
/// records. A dangling or absent reference expands to `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ExpandedPost {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "desc")]
    pub description: Option<String>,
    pub file: Option<Value>,
    pub category: Option<Value>,
    pub updated_by: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[sqlx(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ExpandedPost {
    /// Object key of the attached file, when there is a non-empty one.
    pub fn file_key(&self) -> Option<&str> {
        self.file
            .as_ref()?
            .get("key")?
            .as_str()
            .filter(|key| !key.is_empty())
    }
}
