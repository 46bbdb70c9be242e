use async_trait::async_trait;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{ExpandedPost, Post};
use crate::filter::{PostFilter, PostQuery};

/// Persistence collaborator for posts and the records they reference.
///
/// Implementations own their concurrency control; callers issue one logical
/// read, or one read followed by one write, per request.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn file_exists(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn category_exists(&self, id: Uuid) -> Result<bool, DatabaseError>;

    /// Post by id with references left as ids.
    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError>;

    /// Posts matching the query, sorted, windowed and with relations expanded.
    async fn find_posts(&self, query: &PostQuery) -> Result<Vec<ExpandedPost>, DatabaseError>;

    async fn count_posts(&self, filter: &PostFilter) -> Result<u64, DatabaseError>;

    async fn insert_post(&self, post: &Post) -> Result<(), DatabaseError>;

    /// Overwrite an existing post. Returns false when the post is gone.
    async fn save_post(&self, post: &Post) -> Result<bool, DatabaseError>;

    /// Returns false when no post had that id.
    async fn delete_post(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}
