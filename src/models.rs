use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;
use ts_rs::TS;
use utoipa::ToSchema;

// --- Core Domain Types ---

/// Role
///
/// The three audiences of the planner. A caller's role decides which
/// `/dashboard/<role>` subtree they are allowed to see.
///
/// Wire names are lowercase (`customer`, `vendor`, `admin`) both in JSON and in
/// the `userRole` cookie.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Role {
    // Couples planning a wedding. Also the fallback for anonymous callers.
    #[default]
    Customer,
    Vendor,
    Admin,
}

/// Returned when a string does not name one of the three roles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown role `{0}` (expected customer, vendor or admin)")]
pub struct ParseRoleError(pub String);

impl Role {
    pub const ALL: [Role; 3] = [Role::Customer, Role::Vendor, Role::Admin];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Vendor => "vendor",
            Role::Admin => "admin",
        }
    }

    /// The landing page of this role's dashboard, e.g. `/dashboard/vendor`.
    pub fn home_path(self) -> String {
        format!("/dashboard/{}", self.as_str())
    }

    /// Navigation sections rendered in this role's dashboard sidebar.
    pub fn sections(self) -> &'static [&'static str] {
        match self {
            Role::Customer => &[
                "budget",
                "guests",
                "timeline",
                "documents",
                "messages",
                "vendors",
                "settings",
            ],
            Role::Vendor => &["inquiries", "portfolio", "analytics", "messages", "settings"],
            Role::Admin => &["system", "vendors", "analytics", "settings"],
        }
    }

    pub fn has_section(self, section: &str) -> bool {
        self.sections().contains(&section)
    }
}

impl FromStr for Role {
    type Err = ParseRoleError;

    // Exact, case-sensitive match: the cookie and the URL segment carry the
    // lowercase wire name and nothing else is a valid role.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(Role::Customer),
            "vendor" => Ok(Role::Vendor),
            "admin" => Ok(Role::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Request Payloads (Input Schemas) ---

/// LoginRequest
///
/// Input payload for `POST /api/auth/login`. No credentials are checked: the
/// endpoint only issues the routing cookies for the chosen role.
#[derive(Debug, Clone, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct LoginRequest {
    pub role: Role,
}

// --- Response Payloads (Output Schemas) ---

/// SessionResponse
///
/// What the routing layer currently believes about the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct SessionResponse {
    pub role: Role,
    pub authenticated: bool,
    /// Where the caller lands when visiting `/dashboard`.
    #[schema(example = "/dashboard/customer")]
    pub home: String,
}

/// DashboardView
///
/// Shell descriptor for a dashboard page: which role it belongs to, which
/// section is active (none on the role's landing page) and the sidebar entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct DashboardView {
    pub role: Role,
    pub section: Option<String>,
    pub sections: Vec<String>,
}

impl DashboardView {
    pub fn new(role: Role, section: Option<String>) -> Self {
        Self {
            role,
            section,
            sections: role.sections().iter().map(|s| s.to_string()).collect(),
        }
    }
}
