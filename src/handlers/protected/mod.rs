// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Route Prefix: /api/posts
// Middleware: jwt_auth_middleware, which places AuthUser in request extensions
pub mod posts;
