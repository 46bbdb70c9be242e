// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) -> Protected (JWT auth, caller injected as AuthUser)
pub mod public;
pub mod protected;

use axum::extract::{rejection::QueryRejection, Query};
use serde::Serialize;

use crate::services::{ListParams, PostService};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
}

impl AppState {
    pub fn new(posts: PostService) -> Self {
        Self { posts }
    }
}

/// `data` payload for single-post responses: `{ "post": ... }`
#[derive(Debug, Serialize)]
pub struct PostData<T: Serialize> {
    pub post: T,
}

/// Listing parameters that fail to parse as a whole (a repeated key, for one)
/// fall back to the defaults instead of rejecting the request.
pub(crate) fn list_params(query: Result<Query<ListParams>, QueryRejection>) -> ListParams {
    match query {
        Ok(Query(params)) => params,
        Err(rejection) => {
            tracing::debug!("Ignoring unparseable listing query: {}", rejection.body_text());
            ListParams::default()
        }
    }
}
