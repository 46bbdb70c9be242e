// handlers/public/health.rs - GET / and GET /health handlers
use axum::extract::State;
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::ApiError;
use crate::handlers::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// GET / - service name and version
pub async fn root() -> ApiResult<Value> {
    Ok(ApiResponse::success(
        "Blog Post API",
        json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "endpoints": {
                "posts": "/api/posts[/:id] (protected)",
                "public": "/api/public/posts[/:id] (public)",
                "health": "/health (public)",
            }
        }),
    ))
}

/// GET /health - 503 when the record store cannot be reached
pub async fn health(State(state): State<AppState>) -> ApiResult<Value> {
    state.posts.health_check().await.map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("Database unavailable")
    })?;

    Ok(ApiResponse::success(
        "Service is healthy",
        json!({
            "status": "ok",
            "timestamp": Utc::now(),
            "database": "ok",
        }),
    ))
}
