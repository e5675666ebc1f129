//! Role gate.
//!
//! Decides for every page request whether it passes through untouched or is
//! redirected, based on the path and the caller's [`Session`]. The decision
//! itself ([`GatePolicy::decide`]) is a pure function; [`role_gate`] is the axum
//! middleware that applies it.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use std::{fmt, str::FromStr};
use thiserror::Error;

use crate::{auth::Session, config::AppConfig, models::Role};

pub const DASHBOARD_SEGMENT: &str = "dashboard";
pub const AUTH_SEGMENT: &str = "auth";
pub const LOGIN_PATH: &str = "/auth/login";
pub const FAVICON_PATH: &str = "/favicon.ico";

/// Prefixes skipped by the gate unless `GATE_EXCLUDED_PREFIXES` overrides them:
/// bundled assets, static files and the JSON API.
pub const DEFAULT_EXCLUDED_PREFIXES: [&str; 3] = ["/_next", "/static", "/api"];

/// RuleOrder
///
/// Which family of rules runs first.
///
/// * `AuthFirst`: unauthenticated dashboard requests go straight to the login
///   page, before any role correction.
/// * `RoleFirst`: role corrections run first and the login check only fires on
///   a path whose role segment already matches. An anonymous caller is bounced
///   to `/dashboard/<role>` and only reaches the login redirect on the next hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleOrder {
    #[default]
    AuthFirst,
    RoleFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown rule order `{0}` (expected auth-first or role-first)")]
pub struct ParseRuleOrderError(pub String);

impl FromStr for RuleOrder {
    type Err = ParseRuleOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "auth-first" => Ok(RuleOrder::AuthFirst),
            "role-first" => Ok(RuleOrder::RoleFirst),
            other => Err(ParseRuleOrderError(other.to_string())),
        }
    }
}

/// GateRule
///
/// The rule that produced a redirect. Carried in the decision for logging and
/// assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRule {
    /// `/dashboard` itself goes to the caller's own dashboard.
    DashboardRoot,
    /// A valid but foreign role segment is swapped for the caller's role.
    RoleMismatch,
    /// An unknown role segment is discarded together with the rest of the path.
    InvalidRole,
    /// Logged-in callers never see the `/auth` pages.
    AuthBypass,
    /// Dashboard pages require the authentication flag.
    LoginRequired,
}

impl GateRule {
    pub fn as_str(self) -> &'static str {
        match self {
            GateRule::DashboardRoot => "dashboard_root",
            GateRule::RoleMismatch => "role_mismatch",
            GateRule::InvalidRole => "invalid_role",
            GateRule::AuthBypass => "auth_bypass",
            GateRule::LoginRequired => "login_required",
        }
    }
}

impl fmt::Display for GateRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    PassThrough,
    Redirect { rule: GateRule, location: String },
}

impl GateDecision {
    fn redirect(rule: GateRule, location: impl Into<String>) -> Self {
        GateDecision::Redirect {
            rule,
            location: location.into(),
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            GateDecision::PassThrough => None,
            GateDecision::Redirect { location, .. } => Some(location),
        }
    }
}

/// GateRequest
///
/// The inputs of a single decision. `query` is the raw query string without the
/// leading `?`.
#[derive(Debug, Clone, Copy)]
pub struct GateRequest<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub session: Session,
}

impl<'a> GateRequest<'a> {
    pub fn new(path: &'a str, session: Session) -> Self {
        Self {
            path,
            query: None,
            session,
        }
    }

    pub fn with_query(mut self, query: Option<&'a str>) -> Self {
        self.query = query;
        self
    }
}

/// GatePolicy
///
/// Immutable routing policy, loaded once into `AppConfig` and shared by every
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatePolicy {
    pub order: RuleOrder,
    /// Normalized: leading `/`, no trailing `/`.
    pub excluded_prefixes: Vec<String>,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self::new(RuleOrder::default(), DEFAULT_EXCLUDED_PREFIXES)
    }
}

impl GatePolicy {
    pub fn new<I, P>(order: RuleOrder, excluded_prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<str>,
    {
        let excluded_prefixes = excluded_prefixes
            .into_iter()
            .filter_map(|prefix| normalize_prefix(prefix.as_ref()))
            .collect();

        Self {
            order,
            excluded_prefixes,
        }
    }

    /// is_excluded
    ///
    /// Requests the gate never looks at: excluded prefixes (segment aware, so
    /// `/api` covers `/api/x` but not `/apis`), anything with a `.` in the path,
    /// and the favicon.
    pub fn is_excluded(&self, path: &str) -> bool {
        if path == FAVICON_PATH || path.contains('.') {
            return true;
        }

        self.excluded_prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    /// decide
    ///
    /// Evaluates the rules in the configured order and returns the first
    /// redirect, or `PassThrough` when none applies.
    pub fn decide(&self, request: &GateRequest<'_>) -> GateDecision {
        if self.is_excluded(request.path) {
            return GateDecision::PassThrough;
        }

        let path = SegmentPath::parse(request.path);
        let session = request.session;

        let decision = match self.order {
            RuleOrder::AuthFirst => login_required(&path, session)
                .or_else(|| auth_bypass(&path, session))
                .or_else(|| role_correction(&path, session.role, request.query)),
            RuleOrder::RoleFirst => role_correction(&path, session.role, request.query)
                .or_else(|| auth_bypass(&path, session))
                .or_else(|| login_required(&path, session)),
        };

        decision.unwrap_or(GateDecision::PassThrough)
    }
}

fn normalize_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("/{trimmed}"))
    }
}

/// Path split into its non-empty segments, so `/dashboard/`, `//dashboard` and
/// `/dashboard` all look the same to the rules.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SegmentPath<'a> {
    segments: Vec<&'a str>,
}

impl<'a> SegmentPath<'a> {
    fn parse(path: &'a str) -> Self {
        Self {
            segments: path.split('/').filter(|s| !s.is_empty()).collect(),
        }
    }

    fn starts_with(&self, segment: &str) -> bool {
        self.segments.first() == Some(&segment)
    }

    fn is_dashboard(&self) -> bool {
        self.starts_with(DASHBOARD_SEGMENT)
    }

    fn is_auth(&self) -> bool {
        self.starts_with(AUTH_SEGMENT)
    }

    fn role_segment(&self) -> Option<&'a str> {
        if self.is_dashboard() {
            self.segments.get(1).copied()
        } else {
            None
        }
    }

    /// Re-joins the path with the role segment replaced by `role`.
    fn with_role(&self, role: Role) -> String {
        let mut segments = self.segments.clone();
        if let Some(slot) = segments.get_mut(1) {
            *slot = role.as_str();
        }
        format!("/{}", segments.join("/"))
    }
}

// Rules 1-3. Dashboard paths only.
fn role_correction(path: &SegmentPath<'_>, role: Role, query: Option<&str>) -> Option<GateDecision> {
    if !path.is_dashboard() {
        return None;
    }

    let Some(segment) = path.role_segment() else {
        return Some(GateDecision::redirect(
            GateRule::DashboardRoot,
            role.home_path(),
        ));
    };

    match segment.parse::<Role>() {
        Ok(requested) if requested == role => None,
        Ok(_) => {
            let mut location = path.with_role(role);
            if let Some(query) = query.filter(|q| !q.is_empty()) {
                location.push('?');
                location.push_str(query);
            }
            Some(GateDecision::redirect(GateRule::RoleMismatch, location))
        }
        Err(_) => Some(GateDecision::redirect(
            GateRule::InvalidRole,
            role.home_path(),
        )),
    }
}

// Rule 4.
fn auth_bypass(path: &SegmentPath<'_>, session: Session) -> Option<GateDecision> {
    (path.is_auth() && session.authenticated)
        .then(|| GateDecision::redirect(GateRule::AuthBypass, session.role.home_path()))
}

// Rule 5.
fn login_required(path: &SegmentPath<'_>, session: Session) -> Option<GateDecision> {
    (path.is_dashboard() && !session.authenticated)
        .then(|| GateDecision::redirect(GateRule::LoginRequired, LOGIN_PATH))
}

/// role_gate
///
/// Middleware applied to the whole router. Resolves the [`Session`], asks the
/// configured [`GatePolicy`] for a decision and either answers with a
/// `307 Temporary Redirect` or hands the request to the next service.
pub async fn role_gate(
    State(config): State<AppConfig>,
    session: Session,
    request: Request,
    next: Next,
) -> Response {
    let uri = request.uri().clone();
    let gate_request = GateRequest::new(uri.path(), session).with_query(uri.query());

    match config.gate.decide(&gate_request) {
        GateDecision::PassThrough => {
            tracing::trace!(path = %uri.path(), role = %session.role, "role gate pass-through");
            next.run(request).await
        }
        GateDecision::Redirect { rule, location } => {
            tracing::debug!(
                path = %uri.path(),
                role = %session.role,
                authenticated = session.authenticated,
                rule = %rule,
                location = %location,
                "role gate redirect"
            );
            Redirect::temporary(&location).into_response()
        }
    }
}
