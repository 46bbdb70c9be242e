// handlers/public/posts.rs - GET /api/public/posts[/:id] handlers
use axum::extract::{rejection::QueryRejection, Path, Query, State};

use crate::database::models::ExpandedPost;
use crate::handlers::{list_params, AppState, PostData};
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::{ListParams, PostPage};

/// GET /api/public/posts - every post, with signed `imageUrl` where a file key exists
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<PostPage> {
    let params = list_params(query);
    let page = state.posts.list_all(&params).await?;
    Ok(ApiResponse::success("Get all posts successfully", page))
}

/// GET /api/public/posts/:id
pub async fn show(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<PostData<ExpandedPost>> {
    let post = state.posts.get_any(&id).await?;
    Ok(ApiResponse::success("Get post successfully", PostData { post }))
}
