use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{ExpandedPost, Post};
use crate::database::repository::RecordStore;
use crate::filter::filter_order::FilterOrder;
use crate::filter::filter_where::FilterWhere;
use crate::filter::{Populate, PostFilter, PostQuery};

#[derive(Default)]
struct Tables {
    posts: HashMap<Uuid, Post>,
    /// Referenced records keyed by table name, then id.
    records: HashMap<&'static str, HashMap<Uuid, Map<String, Value>>>,
}

/// `RecordStore` held in process memory. Used when no database is configured
/// and by the tests.
#[derive(Clone, Default)]
pub struct MemoryRecordStore {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_file(&self, id: Uuid, fields: Value) {
        self.insert_record("files", id, fields).await
    }

    pub async fn insert_category(&self, id: Uuid, fields: Value) {
        self.insert_record("categories", id, fields).await
    }

    pub async fn insert_user(&self, id: Uuid, fields: Value) {
        self.insert_record("users", id, fields).await
    }

    pub async fn post_count(&self) -> usize {
        self.tables.read().await.posts.len()
    }

    async fn insert_record(&self, table: &'static str, id: Uuid, fields: Value) {
        let mut record = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        record.insert("id".to_string(), Value::String(id.to_string()));

        let mut tables = self.tables.write().await;
        tables.records.entry(table).or_default().insert(id, record);
    }

    async fn record_exists(&self, table: &str, id: Uuid) -> bool {
        let tables = self.tables.read().await;
        tables.records.get(table).is_some_and(|rows| rows.contains_key(&id))
    }
}

impl Tables {
    fn expand(&self, post: &Post, populate: &[Populate]) -> ExpandedPost {
        let mut expanded = ExpandedPost {
            id: post.id,
            title: post.title.clone(),
            description: post.description.clone(),
            file: None,
            category: None,
            updated_by: None,
            created_at: post.created_at,
            updated_at: post.updated_at,
            image_url: None,
        };

        for relation in populate {
            let record = post
                .reference(relation.column)
                .and_then(|id| self.records.get(relation.table)?.get(&id))
                .map(|record| {
                    let mut record = record.clone();
                    for field in relation.exclude {
                        record.remove(*field);
                    }
                    Value::Object(record)
                });

            match relation.field {
                "file" => expanded.file = record,
                "category" => expanded.category = record,
                "updated_by" => expanded.updated_by = record,
                _ => {}
            }
        }

        expanded
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn file_exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.record_exists("files", id).await)
    }

    async fn category_exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.record_exists("categories", id).await)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn find_posts(&self, query: &PostQuery) -> Result<Vec<ExpandedPost>, DatabaseError> {
        let tables = self.tables.read().await;

        let mut matched: Vec<&Post> = tables
            .posts
            .values()
            .filter(|post| FilterWhere::matches(&query.filter, post))
            .collect();
        matched.sort_by(|a, b| FilterOrder::compare(a, b, &query.order));

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = query
            .limit
            .map_or(usize::MAX, |l| usize::try_from(l).unwrap_or(usize::MAX));

        Ok(matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|post| tables.expand(post, query.populate))
            .collect())
    }

    async fn count_posts(&self, filter: &PostFilter) -> Result<u64, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.values().filter(|post| FilterWhere::matches(filter, post)).count() as u64)
    }

    async fn insert_post(&self, post: &Post) -> Result<(), DatabaseError> {
        self.tables.write().await.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn save_post(&self, post: &Post) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        match tables.posts.get_mut(&post.id) {
            Some(existing) => {
                *existing = post.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DatabaseError> {
        Ok(self.tables.write().await.posts.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
