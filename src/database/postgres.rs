use async_trait::async_trait;
use sqlx::{postgres::PgArguments, PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{ExpandedPost, Post};
use crate::database::repository::RecordStore;
use crate::filter::{PostFilter, PostQuery, SqlParam};

/// `RecordStore` backed by PostgreSQL
#[derive(Clone)]
pub struct PgRecordStore {
    pool: PgPool,
    log_queries: bool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool, log_queries: false }
    }

    pub fn with_query_logging(mut self, enabled: bool) -> Self {
        self.log_queries = enabled;
        self
    }

    async fn exists(&self, table: &str, id: Uuid) -> Result<bool, DatabaseError> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM \"{}\" WHERE \"id\" = $1) AS found", table);
        let row = sqlx::query(&sql).bind(id).fetch_one(&self.pool).await?;
        Ok(row.try_get("found")?)
    }

    fn log(&self, query: &str, params: &[SqlParam]) {
        if self.log_queries {
            debug!(query, ?params, "post query");
        }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn file_exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.exists("files", id).await
    }

    async fn category_exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
        self.exists("categories", id).await
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
        let post = sqlx::query_as::<_, Post>(
            "SELECT id, title, description, file_id, category_id, updated_by, created_at, updated_at
             FROM posts
             WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(post)
    }

    async fn find_posts(&self, query: &PostQuery) -> Result<Vec<ExpandedPost>, DatabaseError> {
        let sql_result = query.to_sql();
        self.log(&sql_result.query, &sql_result.params);

        let mut q = sqlx::query_as::<_, ExpandedPost>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query_as(q, p);
        }
        Ok(q.fetch_all(&self.pool).await?)
    }

    async fn count_posts(&self, filter: &PostFilter) -> Result<u64, DatabaseError> {
        let sql_result = filter.to_count_sql();
        self.log(&sql_result.query, &sql_result.params);

        let mut q = sqlx::query(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param_query(q, p);
        }
        let row = q.fetch_one(&self.pool).await?;
        let count: i64 = row.try_get("count")?;
        u64::try_from(count).map_err(|_| DatabaseError::QueryError(format!("negative count: {}", count)))
    }

    async fn insert_post(&self, post: &Post) -> Result<(), DatabaseError> {
        sqlx::query(
            "INSERT INTO posts (id, title, description, file_id, category_id, updated_by, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.description)
        .bind(post.file)
        .bind(post.category)
        .bind(post.updated_by)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save_post(&self, post: &Post) -> Result<bool, DatabaseError> {
        let result = sqlx::query(
            "UPDATE posts
             SET title = $2, description = $3, file_id = $4, category_id = $5, updated_by = $6, updated_at = $7
             WHERE id = $1",
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.description)
        .bind(post.file)
        .bind(post.category)
        .bind(post.updated_by)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}

fn bind_param_query<'q>(
    q: sqlx::query::Query<'q, sqlx::Postgres, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::Query<'q, sqlx::Postgres, PgArguments> {
    match p {
        SqlParam::Uuid(u) => q.bind(*u),
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Int(i) => q.bind(*i),
    }
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    p: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow>,
{
    match p {
        SqlParam::Uuid(u) => q.bind(*u),
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Int(i) => q.bind(*i),
    }
}
