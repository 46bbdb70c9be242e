// handlers/protected/posts/create.rs - POST /api/posts handler
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::PostInput;

/// POST /api/posts - create a post owned by the caller
pub async fn create(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<PostInput>, JsonRejection>,
) -> ApiResult {
    let Json(input) = payload.map_err(|rejection| ApiError::invalid_json(rejection.body_text()))?;

    state.posts.add_post(user.user_id, input).await?;

    Ok(ApiResponse::created("Post added successfully"))
}
