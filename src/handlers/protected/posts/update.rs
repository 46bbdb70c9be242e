// handlers/protected/posts/update.rs - PUT /api/posts/:id handler
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};

use crate::database::models::Post;
use crate::error::ApiError;
use crate::handlers::{AppState, PostData};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::PostInput;

/// PUT /api/posts/:id - partial update; the caller becomes `updatedBy`
pub async fn update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<PostInput>, JsonRejection>,
) -> ApiResult<PostData<Post>> {
    let Json(input) = payload.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;

    let post = state.posts.update_post(user.user_id, &id, input).await?;

    Ok(ApiResponse::success("Post updated successfully", PostData { post }))
}
