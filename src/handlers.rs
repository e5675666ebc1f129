use crate::{
    auth::{AUTH_COOKIE, ROLE_COOKIE, Session},
    models::{DashboardView, LoginRequest, Role, SessionResponse},
};
use axum::{Json, extract::Path, http::StatusCode};
use tower_cookies::{
    Cookie, Cookies,
    cookie::{CookieBuilder, SameSite},
};

// --- Cookie Helpers ---

// Routing cookies are readable on every path and never sent cross-site.
fn routing_cookie(name: &'static str, value: String) -> CookieBuilder<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
}

fn session_response(session: Session) -> SessionResponse {
    SessionResponse {
        role: session.role,
        authenticated: session.authenticated,
        home: session.role.home_path(),
    }
}

// --- API Handlers ---

/// login
///
/// [API Route] Issues the `userRole` and `isAuthenticated` cookies for the
/// requested role. No credentials are involved: the cookies only steer the role
/// gate. An unknown role is rejected by the JSON extractor with 422.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Routing cookies set", body = SessionResponse),
        (status = 422, description = "Unknown role")
    )
)]
pub async fn login(cookies: Cookies, Json(payload): Json<LoginRequest>) -> Json<SessionResponse> {
    let role = payload.role;

    cookies.add(routing_cookie(ROLE_COOKIE, role.to_string()).into());
    cookies.add(routing_cookie(AUTH_COOKIE, "true".to_string()).into());

    tracing::info!(role = %role, "routing session issued");

    Json(session_response(Session::new(role, true)))
}

/// logout
///
/// [API Route] Clears both routing cookies. The next dashboard request is sent
/// to the login page.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 204, description = "Routing cookies cleared"))
)]
pub async fn logout(cookies: Cookies) -> StatusCode {
    cookies.remove(Cookie::build(ROLE_COOKIE).path("/").into());
    cookies.remove(Cookie::build(AUTH_COOKIE).path("/").into());
    StatusCode::NO_CONTENT
}

/// get_session
///
/// [API Route] Reports the role and authentication flag the gate resolves for
/// the current request.
#[utoipa::path(
    get,
    path = "/api/session",
    responses((status = 200, description = "Resolved session", body = SessionResponse))
)]
pub async fn get_session(session: Session) -> Json<SessionResponse> {
    Json(session_response(session))
}

// --- Page Handlers ---

pub async fn landing() -> &'static str {
    "Wedding planner. Sign in at /auth/login."
}

pub async fn login_page() -> &'static str {
    "Sign in"
}

pub async fn signup_page() -> &'static str {
    "Create an account"
}

/// dashboard_home
///
/// [Dashboard Route] Landing page of a role's dashboard. The gate has already
/// made sure the role segment is the caller's own, so the segment is only
/// validated here for requests that bypassed it.
pub async fn dashboard_home(Path(role): Path<String>) -> Result<Json<DashboardView>, StatusCode> {
    let role = role.parse::<Role>().map_err(|_| StatusCode::NOT_FOUND)?;
    Ok(Json(DashboardView::new(role, None)))
}

/// dashboard_section
///
/// [Dashboard Route] A section page such as `/dashboard/customer/budget`.
/// Sections that do not exist for the role are 404.
pub async fn dashboard_section(
    Path((role, section)): Path<(String, String)>,
) -> Result<Json<DashboardView>, StatusCode> {
    let role = role.parse::<Role>().map_err(|_| StatusCode::NOT_FOUND)?;

    if !role.has_section(&section) {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(Json(DashboardView::new(role, Some(section))))
}

pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
