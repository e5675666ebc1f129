use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Dashboard Router Module
///
/// One subtree per role. No `/dashboard` route exists: the gate
/// always redirects the bare root to `/dashboard/<role>` (or to the login page).
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        // GET /dashboard/{role}
        .route("/dashboard/{role}", get(handlers::dashboard_home))
        // GET /dashboard/{role}/{section}
        // e.g. /dashboard/customer/budget, /dashboard/vendor/inquiries
        .route(
            "/dashboard/{role}/{section}",
            get(handlers::dashboard_section),
        )
}
