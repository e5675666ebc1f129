use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use tower_cookies::Cookies;

use crate::models::Role;

/// Cookie holding the caller's role (`customer`, `vendor` or `admin`).
pub const ROLE_COOKIE: &str = "userRole";
/// Cookie whose value `"true"` marks the caller as logged in.
pub const AUTH_COOKIE: &str = "isAuthenticated";
/// Header consulted when the role cookie is missing or unusable.
pub const ROLE_HEADER: &str = "x-user-role";

/// Session
///
/// The routing identity of a request: its resolved role and whether it carries
/// the authentication flag. Nothing here is verified. The flag is a plaintext
/// cookie and only steers redirects, it does not grant access to data.
///
/// Both the role gate and the downstream handlers extract this type, so role
/// resolution is defined in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    pub role: Role,
    pub authenticated: bool,
}

impl Session {
    pub fn new(role: Role, authenticated: bool) -> Self {
        Self {
            role,
            authenticated,
        }
    }

    /// resolve
    ///
    /// Builds the session from the raw request inputs.
    ///
    /// Role precedence: cookie, then header, then `Role::Customer`. A value that
    /// is not a valid role is skipped as if it were absent, otherwise a cookie
    /// like `userRole=bogus` would send the gate into a redirect loop.
    ///
    /// Authentication is `true` only for the exact cookie value `"true"`.
    pub fn resolve(
        role_cookie: Option<&str>,
        role_header: Option<&str>,
        auth_cookie: Option<&str>,
    ) -> Self {
        let role = role_cookie
            .and_then(|value| value.parse::<Role>().ok())
            .or_else(|| role_header.and_then(|value| value.parse::<Role>().ok()))
            .unwrap_or_default();

        Self {
            role,
            authenticated: auth_cookie == Some("true"),
        }
    }
}

/// Session Extractor Implementation
///
/// Reads the cookie jar installed by `CookieManagerLayer` plus the `x-user-role`
/// header. Missing or malformed values never reject the request; they resolve to
/// the anonymous defaults. The only rejection is a wiring error: the cookie
/// layer is not installed above the route.
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let cookies = Cookies::from_request_parts(parts, state).await?;

        let role_cookie = cookies.get(ROLE_COOKIE);
        let auth_cookie = cookies.get(AUTH_COOKIE);
        let role_header = parts
            .headers
            .get(ROLE_HEADER)
            .and_then(|value| value.to_str().ok());

        Ok(Session::resolve(
            role_cookie.as_ref().map(|c| c.value()),
            role_header,
            auth_cookie.as_ref().map(|c| c.value()),
        ))
    }
}
