use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// API Router Module
///
/// Nested under `/api`, which the gate skips by default. These endpoints issue
/// and report the routing cookies the gate reads.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // GET /api/health
        // Liveness probe for the load balancer.
        .route("/health", get(|| async { "ok" }))
        // GET /api/session
        .route("/session", get(handlers::get_session))
        // POST /api/auth/login
        // Sets `userRole` and `isAuthenticated=true`.
        .route("/auth/login", post(handlers::login))
        // POST /api/auth/logout
        .route("/auth/logout", post(handlers::logout))
}
