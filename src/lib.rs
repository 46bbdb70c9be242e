pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod storage;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub use handlers::AppState;

use handlers::{protected, public};
use middleware::jwt_auth_middleware;

/// Build the full router: public routes, JWT-protected routes and the
/// global layers (CORS, body limit, request tracing).
pub fn app(state: AppState) -> Router {
    let api = &config::config().api;

    let mut router = Router::new()
        .merge(public_routes())
        .merge(protected_routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(api.max_request_size_bytes));

    if let Some(cors) = cors_layer() {
        router = router.layer(cors);
    }

    router.layer(TraceLayer::new_for_http())
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/api/public/posts", get(public::public_post_list))
        .route("/api/public/posts/:id", get(public::public_post_show))
}

fn protected_routes() -> Router<AppState> {
    use protected::posts;

    Router::new()
        .route("/api/posts", get(posts::post_list).post(posts::post_create))
        .route(
            "/api/posts/:id",
            get(posts::post_show)
                .put(posts::post_update)
                .delete(posts::post_delete),
        )
        .route_layer(axum::middleware::from_fn(jwt_auth_middleware))
}

fn cors_layer() -> Option<CorsLayer> {
    let security = &config::config().security;
    if !security.enable_cors {
        return None;
    }

    let origin = if security.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins = security
            .cors_origins
            .iter()
            .filter_map(|o| match HeaderValue::from_str(o) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        AllowOrigin::list(origins)
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
