use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Pages any caller may request. The role gate still sees these requests:
/// `/auth/*` redirects an authenticated caller to their own dashboard.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /
        .route("/", get(handlers::landing))
        // GET /auth/login
        // Target of every "login required" redirect.
        .route("/auth/login", get(handlers::login_page))
        // GET /auth/signup
        .route("/auth/signup", get(handlers::signup_page))
}
