// handlers/protected/posts/delete.rs - DELETE /api/posts/:id handler
use axum::extract::{Path, State};

use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// DELETE /api/posts/:id
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult {
    state.posts.delete_post(&id).await?;
    Ok(ApiResponse::message("Post deleted successfully"))
}
