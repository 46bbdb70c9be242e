#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use blog_post_api::auth::{generate_jwt, Claims};
use blog_post_api::database::MemoryRecordStore;
use blog_post_api::services::PostService;
use blog_post_api::storage::{BlobUrlSigner, SignerError};
use blog_post_api::{app, AppState};

/// Signer that records every key it is asked for
#[derive(Default)]
pub struct RecordingSigner {
    keys: Mutex<Vec<String>>,
}

impl RecordingSigner {
    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobUrlSigner for RecordingSigner {
    async fn signed_url(&self, key: &str) -> Result<String, SignerError> {
        self.keys.lock().unwrap().push(key.to_string());
        Ok(format!("https://cdn.test/{}?sig=1", key))
    }
}

/// In-process app over the memory store, seeded with two users, a category
/// and one file with a key.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryRecordStore,
    pub signer: Arc<RecordingSigner>,
    pub alice: Uuid,
    pub bob: Uuid,
    pub category: Uuid,
    pub file: Uuid,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = MemoryRecordStore::new();
        let signer = Arc::new(RecordingSigner::default());

        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        let category = Uuid::new_v4();
        let file = Uuid::new_v4();

        store
            .insert_user(alice, json!({"name": "Alice", "email": "alice@test", "password": "hash", "verification_code": "1234"}))
            .await;
        store
            .insert_user(bob, json!({"name": "Bob", "email": "bob@test", "password": "hash"}))
            .await;
        store.insert_category(category, json!({"title": "News"})).await;
        store.insert_file(file, json!({"key": "uploads/cover.png", "name": "cover.png"})).await;

        let service = PostService::new(Arc::new(store.clone()), signer.clone());
        let router = app(AppState::new(service));

        Self { router, store, signer, alice, bob, category, file }
    }

    pub fn token_for(&self, user: Uuid) -> String {
        generate_jwt(&Claims::new(user)).expect("token")
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user: Option<Uuid>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token_for(user)));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-JSON body: {:?}", bytes))?
        };
        Ok((status, value))
    }

    /// Create a post as `user` and return its id, found via the owned listing
    pub async fn create_post(&self, user: Uuid, title: &str, file: Option<Uuid>) -> Result<String> {
        let mut body = json!({"title": title, "desc": "body", "category": self.category.to_string()});
        if let Some(file) = file {
            body["file"] = json!(file.to_string());
        }

        let (status, value) = self.request(Method::POST, "/api/posts", Some(user), Some(body)).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create failed: {} {}", status, value);

        let (_, list) = self.request(Method::GET, "/api/posts?size=1", Some(user), None).await?;
        list["data"]["posts"][0]["_id"]
            .as_str()
            .map(str::to_string)
            .context("created post missing from listing")
    }
}
