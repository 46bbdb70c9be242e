// handlers/protected/posts/show.rs - GET /api/posts/:id handler
use axum::{
    extract::{Path, State},
    Extension,
};

use crate::database::models::ExpandedPost;
use crate::handlers::{AppState, PostData};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};

/// GET /api/posts/:id - only posts last updated by the caller are visible
pub async fn show(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<PostData<ExpandedPost>> {
    let post = state.posts.get_owned(user.user_id, &id).await?;
    Ok(ApiResponse::success("Get post successfully", PostData { post }))
}
