use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{ExpandedPost, Post};
use crate::database::repository::RecordStore;
use crate::filter::{Pagination, PostFilter, PostQuery, GLOBAL_PAGE_SIZE, OWNED_PAGE_SIZE};
use crate::storage::{BlobUrlSigner, SignerError};

#[derive(Debug, Error)]
pub enum PostError {
    #[error("Title is required")]
    TitleRequired,

    #[error("File not found")]
    FileNotFound,

    #[error("Category not found")]
    CategoryNotFound,

    #[error("Post not found")]
    PostNotFound,

    /// Owner-scoped lookups do not distinguish a missing post from someone else's.
    #[error("Post not found or you don't have access")]
    PostNotOwned,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Signer(#[from] SignerError),
}

/// Body of create and update requests. Ids arrive as strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostInput {
    pub title: Option<String>,
    #[serde(rename = "desc")]
    pub description: Option<String>,
    pub file: Option<String>,
    pub category: Option<String>,
}

/// Raw listing parameters. Kept as strings so bad numbers fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub size: Option<String>,
    pub q: Option<String>,
    pub category: Option<String>,
}

impl ListParams {
    fn pagination(&self, default_size: u64) -> Pagination {
        Pagination::from_query(self.page.as_deref(), self.size.as_deref(), default_size)
    }

    /// `None` when the category filter can never match.
    fn filter(&self) -> Option<PostFilter> {
        let category = match parse_reference(self.category.as_deref()) {
            Ok(category) => category,
            Err(()) => return None,
        };
        Some(PostFilter::new().search(self.q.as_deref()).category(category))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostPage {
    pub posts: Vec<ExpandedPost>,
    pub total: u64,
    pub pages: u64,
}

impl PostPage {
    fn empty() -> Self {
        Self { posts: vec![], total: 0, pages: 0 }
    }
}

/// Posts over a record store, with asset URLs from a blob signer
#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn RecordStore>,
    signer: Arc<dyn BlobUrlSigner>,
}

impl PostService {
    pub fn new(store: Arc<dyn RecordStore>, signer: Arc<dyn BlobUrlSigner>) -> Self {
        Self { store, signer }
    }

    pub async fn health_check(&self) -> Result<(), PostError> {
        Ok(self.store.health_check().await?)
    }

    /// Confirm that the file (when given) and the category (when given, or
    /// always when `require_category`) exist. File is checked first.
    pub async fn validate_references(
        &self,
        file: Option<&str>,
        category: Option<&str>,
        require_category: bool,
    ) -> Result<(Option<Uuid>, Option<Uuid>), PostError> {
        let file = parse_reference(file).map_err(|_| PostError::FileNotFound)?;
        if let Some(id) = file {
            if !self.store.file_exists(id).await? {
                return Err(PostError::FileNotFound);
            }
        }

        let category = parse_reference(category).map_err(|_| PostError::CategoryNotFound)?;
        match category {
            Some(id) => {
                if !self.store.category_exists(id).await? {
                    return Err(PostError::CategoryNotFound);
                }
            }
            None if require_category => return Err(PostError::CategoryNotFound),
            None => {}
        }

        Ok((file, category))
    }

    pub async fn add_post(&self, caller: Uuid, input: PostInput) -> Result<Post, PostError> {
        let title = input
            .title
            .filter(|t| !t.trim().is_empty())
            .ok_or(PostError::TitleRequired)?;

        let (file, category) = self
            .validate_references(input.file.as_deref(), input.category.as_deref(), true)
            .await?;
        let category = category.ok_or(PostError::CategoryNotFound)?;

        let post = Post::new(title, input.description, file, category, caller);
        self.store.insert_post(&post).await?;

        info!(post_id = %post.id, user_id = %caller, "Post created");
        Ok(post)
    }

    /// Partial update. Title and category keep their value when omitted or
    /// empty; description and file always take the submitted value, so
    /// omitting them clears them.
    pub async fn update_post(&self, caller: Uuid, id: &str, input: PostInput) -> Result<Post, PostError> {
        let (file, category) = self
            .validate_references(input.file.as_deref(), input.category.as_deref(), false)
            .await?;

        let id = parse_id(id).ok_or(PostError::PostNotFound)?;
        let mut post = self.store.find_post(id).await?.ok_or(PostError::PostNotFound)?;

        if let Some(title) = input.title.filter(|t| !t.trim().is_empty()) {
            post.title = title;
        }
        post.description = input.description;
        post.file = file;
        if let Some(category) = category {
            post.category = category;
        }
        post.updated_by = caller;
        post.updated_at = Utc::now();

        if !self.store.save_post(&post).await? {
            return Err(PostError::PostNotFound);
        }

        info!(post_id = %post.id, user_id = %caller, "Post updated");
        Ok(post)
    }

    pub async fn delete_post(&self, id: &str) -> Result<(), PostError> {
        let id = parse_id(id).ok_or(PostError::PostNotFound)?;
        if self.store.find_post(id).await?.is_none() {
            return Err(PostError::PostNotFound);
        }
        if !self.store.delete_post(id).await? {
            return Err(PostError::PostNotFound);
        }

        info!(post_id = %id, "Post deleted");
        Ok(())
    }

    /// The caller's own posts, newest first.
    pub async fn list_owned(&self, caller: Uuid, params: &ListParams) -> Result<PostPage, PostError> {
        let pagination = params.pagination(OWNED_PAGE_SIZE);
        match params.filter() {
            Some(filter) => self.list(filter.owned_by(caller), pagination).await,
            None => Ok(PostPage::empty()),
        }
    }

    /// Everyone's posts, newest first, with `imageUrl` for posts whose file has a key.
    pub async fn list_all(&self, params: &ListParams) -> Result<PostPage, PostError> {
        let pagination = params.pagination(GLOBAL_PAGE_SIZE);
        let Some(filter) = params.filter() else {
            return Ok(PostPage::empty());
        };

        let mut page = self.list(filter, pagination).await?;
        page.posts = self.attach_image_urls(page.posts).await?;
        Ok(page)
    }

    pub async fn get_owned(&self, caller: Uuid, id: &str) -> Result<ExpandedPost, PostError> {
        let id = parse_id(id).ok_or(PostError::PostNotOwned)?;
        self.find_one(PostFilter::by_id(id).owned_by(caller))
            .await?
            .ok_or(PostError::PostNotOwned)
    }

    pub async fn get_any(&self, id: &str) -> Result<ExpandedPost, PostError> {
        let id = parse_id(id).ok_or(PostError::PostNotFound)?;
        self.find_one(PostFilter::by_id(id)).await?.ok_or(PostError::PostNotFound)
    }

    async fn find_one(&self, filter: PostFilter) -> Result<Option<ExpandedPost>, PostError> {
        let posts = self.store.find_posts(&PostQuery::single(filter)).await?;
        Ok(posts.into_iter().next())
    }

    async fn list(&self, filter: PostFilter, pagination: Pagination) -> Result<PostPage, PostError> {
        let total = self.store.count_posts(&filter).await?;
        let pages = pagination.page_count(total);
        let posts = self
            .store
            .find_posts(&PostQuery::new(filter).paginate(&pagination))
            .await?;

        debug!(page = pagination.page, size = pagination.size, total, returned = posts.len(), "Listed posts");
        Ok(PostPage { posts, total, pages })
    }

    async fn attach_image_urls(&self, posts: Vec<ExpandedPost>) -> Result<Vec<ExpandedPost>, PostError> {
        let signer = &self.signer;
        try_join_all(posts.into_iter().map(|mut post| async move {
            if let Some(key) = post.file_key().map(str::to_string) {
                post.image_url = Some(signer.signed_url(&key).await?);
            }
            Ok::<_, PostError>(post)
        }))
        .await
    }
}

fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// Absent or empty ids are `Ok(None)`; ids that can never resolve are `Err`.
fn parse_reference(raw: Option<&str>) -> Result<Option<Uuid>, ()> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => parse_id(s).map(Some).ok_or(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryRecordStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingSigner {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl BlobUrlSigner for CountingSigner {
        async fn signed_url(&self, key: &str) -> Result<String, SignerError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("https://signed.test/{}", key))
        }
    }

    struct BrokenSigner;

    #[async_trait]
    impl BlobUrlSigner for BrokenSigner {
        async fn signed_url(&self, key: &str) -> Result<String, SignerError> {
            Err(SignerError::Presign { key: key.to_string(), message: "no credentials".into() })
        }
    }

    struct Fixture {
        store: MemoryRecordStore,
        signer: Arc<CountingSigner>,
        service: PostService,
        user: Uuid,
        category: Uuid,
        file: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = MemoryRecordStore::new();
        let signer = Arc::new(CountingSigner::default());
        let user = Uuid::new_v4();
        let category = Uuid::new_v4();
        let file = Uuid::new_v4();
        store.insert_user(user, json!({"name": "Ada", "password": "hash"})).await;
        store.insert_category(category, json!({"title": "News"})).await;
        store.insert_file(file, json!({"key": "uploads/a.png"})).await;

        let service = PostService::new(Arc::new(store.clone()), signer.clone());
        Fixture { store, signer, service, user, category, file }
    }

    fn input(title: &str, category: Option<Uuid>, file: Option<Uuid>) -> PostInput {
        PostInput {
            title: Some(title.to_string()),
            description: Some("body".to_string()),
            file: file.map(|f| f.to_string()),
            category: category.map(|c| c.to_string()),
        }
    }

    #[tokio::test]
    async fn create_with_unknown_category_persists_nothing() {
        let f = fixture().await;
        let err = f.service.add_post(f.user, input("Hi", Some(Uuid::new_v4()), None)).await.unwrap_err();
        assert!(matches!(err, PostError::CategoryNotFound));

        let err = f.service.add_post(f.user, input("Hi", None, None)).await.unwrap_err();
        assert!(matches!(err, PostError::CategoryNotFound));
        assert_eq!(f.store.post_count().await, 0);
    }

    #[tokio::test]
    async fn create_checks_file_before_category() {
        let f = fixture().await;
        let err = f
            .service
            .add_post(f.user, input("Hi", Some(Uuid::new_v4()), Some(Uuid::new_v4())))
            .await
            .unwrap_err();
        assert!(matches!(err, PostError::FileNotFound));
    }

    #[tokio::test]
    async fn create_without_file_has_no_file_reference() {
        let f = fixture().await;
        let post = f.service.add_post(f.user, input("Hi", Some(f.category), None)).await.unwrap();
        assert_eq!(post.file, None);
        assert_eq!(post.updated_by, f.user);
        assert_eq!(f.store.find_post(post.id).await.unwrap(), Some(post));
    }

    #[tokio::test]
    async fn create_requires_title() {
        let f = fixture().await;
        let err = f.service.add_post(f.user, input("  ", Some(f.category), None)).await.unwrap_err();
        assert!(matches!(err, PostError::TitleRequired));
        assert_eq!(f.store.post_count().await, 0);
    }

    #[tokio::test]
    async fn update_title_only_clears_description_and_file() {
        let f = fixture().await;
        let post = f.service.add_post(f.user, input("Old", Some(f.category), Some(f.file))).await.unwrap();

        let body = PostInput { title: Some("New".into()), ..PostInput::default() };
        let updated = f.service.update_post(f.user, &post.id.to_string(), body).await.unwrap();

        assert_eq!(updated.title, "New");
        assert_eq!(updated.description, None);
        assert_eq!(updated.file, None);
        assert_eq!(updated.category, f.category);
    }

    #[tokio::test]
    async fn update_category_only_keeps_title_and_reassigns_owner() {
        let f = fixture().await;
        let post = f.service.add_post(f.user, input("Keep me", Some(f.category), None)).await.unwrap();
        let other_category = Uuid::new_v4();
        f.store.insert_category(other_category, json!({"title": "Other"})).await;
        let editor = Uuid::new_v4();

        let body = PostInput { category: Some(other_category.to_string()), ..PostInput::default() };
        let updated = f.service.update_post(editor, &post.id.to_string(), body).await.unwrap();

        assert_eq!(updated.title, "Keep me");
        assert_eq!(updated.category, other_category);
        assert_eq!(updated.description, None);
        assert_eq!(updated.updated_by, editor);
    }

    #[tokio::test]
    async fn update_validates_references_before_loading_post() {
        let f = fixture().await;
        let body = PostInput { file: Some(Uuid::new_v4().to_string()), ..PostInput::default() };
        let err = f.service.update_post(f.user, &Uuid::new_v4().to_string(), body).await.unwrap_err();
        assert!(matches!(err, PostError::FileNotFound));

        let err = f
            .service
            .update_post(f.user, &Uuid::new_v4().to_string(), PostInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, PostError::PostNotFound));
    }

    #[tokio::test]
    async fn delete_missing_post_is_not_found() {
        let f = fixture().await;
        let err = f.service.delete_post(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, PostError::PostNotFound));
        let err = f.service.delete_post("not-an-id").await.unwrap_err();
        assert!(matches!(err, PostError::PostNotFound));
    }

    #[tokio::test]
    async fn owned_listing_only_returns_callers_posts() {
        let f = fixture().await;
        let other = Uuid::new_v4();
        for i in 0..3 {
            f.service.add_post(f.user, input(&format!("mine abc {}", i), Some(f.category), None)).await.unwrap();
            f.service.add_post(other, input(&format!("theirs abc {}", i), Some(f.category), None)).await.unwrap();
        }

        let combos = [
            ListParams::default(),
            ListParams { q: Some("ABC".into()), ..ListParams::default() },
            ListParams { category: Some(f.category.to_string()), ..ListParams::default() },
            ListParams { q: Some("theirs".into()), size: Some("1".into()), ..ListParams::default() },
        ];
        for params in combos {
            let page = f.service.list_owned(f.user, &params).await.unwrap();
            assert!(page.posts.iter().all(|p| p.updated_by.as_ref().unwrap()["id"] == json!(f.user.to_string())
                || p.updated_by.is_none()));
            assert!(page.posts.iter().all(|p| p.title.starts_with("mine")));
        }

        let page = f.service.list_owned(f.user, &ListParams::default()).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.pages, 1);
    }

    #[tokio::test]
    async fn empty_result_has_zero_pages() {
        let f = fixture().await;
        let page = f.service.list_all(&ListParams::default()).await.unwrap();
        assert_eq!(page, PostPage { posts: vec![], total: 0, pages: 0 });
    }

    #[tokio::test]
    async fn malformed_category_filter_matches_nothing() {
        let f = fixture().await;
        f.service.add_post(f.user, input("Hi", Some(f.category), None)).await.unwrap();
        let params = ListParams { category: Some("nope".into()), ..ListParams::default() };
        assert_eq!(f.service.list_all(&params).await.unwrap().total, 0);
        assert_eq!(f.service.list_owned(f.user, &params).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn global_listing_signs_only_posts_with_file_keys() {
        let f = fixture().await;
        f.service.add_post(f.user, input("with file", Some(f.category), Some(f.file))).await.unwrap();
        f.service.add_post(f.user, input("without file", Some(f.category), None)).await.unwrap();

        let page = f.service.list_all(&ListParams::default()).await.unwrap();
        assert_eq!(page.total, 2);
        let without = &page.posts[0];
        let with = &page.posts[1];
        assert_eq!(without.title, "without file");
        assert_eq!(without.image_url, None);
        assert_eq!(with.image_url.as_deref(), Some("https://signed.test/uploads/a.png"));
        assert_eq!(f.signer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn global_listing_default_size_is_five() {
        let f = fixture().await;
        for i in 0..12 {
            f.service.add_post(f.user, input(&format!("p{}", i), Some(f.category), None)).await.unwrap();
        }
        let page = f.service.list_all(&ListParams::default()).await.unwrap();
        assert_eq!(page.posts.len(), 5);
        assert_eq!(page.total, 12);
        assert_eq!(page.pages, 3);

        let page = f.service.list_owned(f.user, &ListParams::default()).await.unwrap();
        assert_eq!(page.posts.len(), 10);
        assert_eq!(page.pages, 2);
    }

    #[tokio::test]
    async fn signing_failure_fails_the_listing() {
        let f = fixture().await;
        f.service.add_post(f.user, input("with file", Some(f.category), Some(f.file))).await.unwrap();

        let service = PostService::new(Arc::new(f.store.clone()), Arc::new(BrokenSigner));
        let err = service.list_all(&ListParams::default()).await.unwrap_err();
        assert!(matches!(err, PostError::Signer(_)));
    }

    #[tokio::test]
    async fn owned_read_hides_other_users_posts() {
        let f = fixture().await;
        let post = f.service.add_post(f.user, input("Mine", Some(f.category), None)).await.unwrap();
        let id = post.id.to_string();

        assert_eq!(f.service.get_owned(f.user, &id).await.unwrap().title, "Mine");
        let err = f.service.get_owned(Uuid::new_v4(), &id).await.unwrap_err();
        assert!(matches!(err, PostError::PostNotOwned));
        let err = f.service.get_owned(f.user, &Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, PostError::PostNotOwned));

        assert_eq!(f.service.get_any(&id).await.unwrap().title, "Mine");
        let err = f.service.get_any(&Uuid::new_v4().to_string()).await.unwrap_err();
        assert!(matches!(err, PostError::PostNotFound));
    }

    /// Store where every post vanishes right after it is read, as if a
    /// concurrent delete landed between the read and the write.
    struct VanishingStore {
        inner: MemoryRecordStore,
    }

    #[async_trait]
    impl RecordStore for VanishingStore {
        async fn file_exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
            self.inner.file_exists(id).await
        }

        async fn category_exists(&self, id: Uuid) -> Result<bool, DatabaseError> {
            self.inner.category_exists(id).await
        }

        async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DatabaseError> {
            let post = self.inner.find_post(id).await?;
            self.inner.delete_post(id).await?;
            Ok(post)
        }

        async fn find_posts(&self, query: &PostQuery) -> Result<Vec<ExpandedPost>, DatabaseError> {
            self.inner.find_posts(query).await
        }

        async fn count_posts(&self, filter: &PostFilter) -> Result<u64, DatabaseError> {
            self.inner.count_posts(filter).await
        }

        async fn insert_post(&self, post: &Post) -> Result<(), DatabaseError> {
            self.inner.insert_post(post).await
        }

        async fn save_post(&self, post: &Post) -> Result<bool, DatabaseError> {
            self.inner.save_post(post).await
        }

        async fn delete_post(&self, id: Uuid) -> Result<bool, DatabaseError> {
            self.inner.delete_post(id).await
        }

        async fn health_check(&self) -> Result<(), DatabaseError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn update_of_post_deleted_meanwhile_is_not_found() {
        let f = fixture().await;
        let post = f.service.add_post(f.user, input("Gone soon", Some(f.category), None)).await.unwrap();

        let service = PostService::new(Arc::new(VanishingStore { inner: f.store.clone() }), f.signer.clone());
        let body = PostInput { title: Some("Too late".into()), ..PostInput::default() };
        let err = service.update_post(f.user, &post.id.to_string(), body).await.unwrap_err();
        assert!(matches!(err, PostError::PostNotFound));
        assert_eq!(f.store.post_count().await, 0);
    }

    #[tokio::test]
    async fn delete_of_post_deleted_meanwhile_is_not_found() {
        let f = fixture().await;
        let post = f.service.add_post(f.user, input("Gone soon", Some(f.category), None)).await.unwrap();

        let service = PostService::new(Arc::new(VanishingStore { inner: f.store.clone() }), f.signer.clone());
        let err = service.delete_post(&post.id.to_string()).await.unwrap_err();
        assert!(matches!(err, PostError::PostNotFound));
    }

    #[tokio::test]
    async fn update_with_blank_title_keeps_existing_title() {
        let f = fixture().await;
        let post = f.service.add_post(f.user, input("Original", Some(f.category), None)).await.unwrap();

        let body = PostInput { title: Some("   ".into()), ..PostInput::default() };
        let updated = f.service.update_post(f.user, &post.id.to_string(), body).await.unwrap();
        assert_eq!(updated.title, "Original");
    }
}
