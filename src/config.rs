use std::env;

use crate::gate::{GatePolicy, RuleOrder};

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup,
/// never mutated, and pulled into handlers and middleware via `FromRef`.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the log format.
    pub env: Env,
    // Socket address the HTTP server binds to.
    pub bind_addr: String,
    // Redirect rules applied by the role gate.
    pub gate: GatePolicy,
}

/// Env
///
/// Local runs log in a human-readable format, production runs emit JSON lines.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

impl Default for AppConfig {
    /// default
    ///
    /// Safe, non-panicking configuration used by tests: local env, default bind
    /// address and the default gate policy (auth check first).
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            gate: GatePolicy::default(),
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables.
    ///
    /// * `APP_ENV`: `production` or anything else for local.
    /// * `BIND_ADDR`: defaults to `0.0.0.0:3000`.
    /// * `GATE_RULE_ORDER`: `auth-first` (default) or `role-first`.
    /// * `GATE_EXCLUDED_PREFIXES`: comma-separated path prefixes the gate skips.
    ///
    /// # Panics
    /// Panics on a `GATE_RULE_ORDER` value that is neither ordering, so a typo
    /// cannot silently change which callers reach the dashboards.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

        let order = match env::var("GATE_RULE_ORDER") {
            Ok(raw) => raw
                .parse::<RuleOrder>()
                .unwrap_or_else(|e| panic!("FATAL: GATE_RULE_ORDER is invalid: {e}")),
            Err(_) => RuleOrder::default(),
        };

        let gate = match env::var("GATE_EXCLUDED_PREFIXES") {
            Ok(raw) => GatePolicy::new(order, raw.split(',')),
            Err(_) => GatePolicy {
                order,
                ..GatePolicy::default()
            },
        };

        Self {
            env,
            bind_addr,
            gate,
        }
    }
}
