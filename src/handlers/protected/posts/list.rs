// handlers/protected/posts/list.rs - GET /api/posts handler
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension,
};

use crate::handlers::{list_params, AppState};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::{ListParams, PostPage};

/// GET /api/posts - the caller's posts, newest first
pub async fn list(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: Result<Query<ListParams>, QueryRejection>,
) -> ApiResult<PostPage> {
    let params = list_params(query);
    let page = state.posts.list_owned(user.user_id, &params).await?;
    Ok(ApiResponse::success("Get post list successfully", page))
}
