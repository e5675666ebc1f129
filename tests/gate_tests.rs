use wedding_gate::{
    GateDecision, GatePolicy, GateRequest, GateRule, Role, RuleOrder, Session,
};

// --- Helpers ---

fn policy(order: RuleOrder) -> GatePolicy {
    GatePolicy {
        order,
        ..GatePolicy::default()
    }
}

fn both_orders() -> [GatePolicy; 2] {
    [policy(RuleOrder::AuthFirst), policy(RuleOrder::RoleFirst)]
}

fn signed_in(role: Role) -> Session {
    Session::new(role, true)
}

fn decide(policy: &GatePolicy, path: &str, session: Session) -> GateDecision {
    policy.decide(&GateRequest::new(path, session))
}

fn redirect(rule: GateRule, location: &str) -> GateDecision {
    GateDecision::Redirect {
        rule,
        location: location.to_string(),
    }
}

// --- Exclusions ---

#[test]
fn test_excluded_paths_always_pass_through() {
    let excluded = [
        "/_next/static/chunks/main.js",
        "/_next/data",
        "/api/auth/login",
        "/api",
        "/static/logo",
        "/favicon.ico",
        "/dashboard/admin/report.pdf",
        "/auth/login.html",
    ];
    let sessions = [
        Session::default(),
        signed_in(Role::Customer),
        signed_in(Role::Vendor),
        Session::new(Role::Admin, false),
    ];

    for policy in both_orders() {
        for path in excluded {
            for session in sessions {
                assert_eq!(
                    decide(&policy, path, session),
                    GateDecision::PassThrough,
                    "{path} should bypass the gate ({:?}, {session:?})",
                    policy.order
                );
            }
        }
    }
}

#[test]
fn test_prefix_exclusion_is_segment_aware() {
    let policy = GatePolicy::default();
    assert!(policy.is_excluded("/api"));
    assert!(policy.is_excluded("/api/session"));
    assert!(!policy.is_excluded("/apis"));
    assert!(!policy.is_excluded("/dashboard/api"));
}

#[test]
fn test_custom_prefixes_are_normalized() {
    let policy = GatePolicy::new(RuleOrder::AuthFirst, [" assets/ ", "", "/internal"]);
    assert_eq!(policy.excluded_prefixes, vec!["/assets", "/internal"]);
    assert!(policy.is_excluded("/assets/app"));
    assert!(policy.is_excluded("/internal"));
    // Default prefixes are replaced, not extended.
    assert!(!policy.is_excluded("/api/session"));
}

// --- Rule 1: dashboard root ---

#[test]
fn test_dashboard_root_redirects_to_own_dashboard() {
    for policy in both_orders() {
        assert_eq!(
            decide(&policy, "/dashboard", signed_in(Role::Vendor)),
            redirect(GateRule::DashboardRoot, "/dashboard/vendor")
        );
        assert_eq!(
            decide(&policy, "/dashboard/", signed_in(Role::Admin)),
            redirect(GateRule::DashboardRoot, "/dashboard/admin")
        );
    }
}

// --- Rule 2: role mismatch ---

#[test]
fn test_mismatched_role_segment_is_substituted() {
    for policy in both_orders() {
        assert_eq!(
            decide(&policy, "/dashboard/admin/settings", signed_in(Role::Customer)),
            redirect(GateRule::RoleMismatch, "/dashboard/customer/settings")
        );
    }
}

#[test]
fn test_substitution_only_touches_the_role_segment() {
    let policy = GatePolicy::default();
    assert_eq!(
        decide(&policy, "/dashboard/vendor/vendors/vendor", signed_in(Role::Admin)),
        redirect(GateRule::RoleMismatch, "/dashboard/admin/vendors/vendor")
    );
}

#[test]
fn test_substitution_keeps_query_string() {
    let policy = GatePolicy::default();
    let request = GateRequest::new("/dashboard/vendor/messages", signed_in(Role::Customer))
        .with_query(Some("thread=42"));

    assert_eq!(
        policy.decide(&request),
        redirect(GateRule::RoleMismatch, "/dashboard/customer/messages?thread=42")
    );
}

// --- Rule 3: invalid role segment ---

#[test]
fn test_invalid_role_segment_drops_trailing_path() {
    for policy in both_orders() {
        assert_eq!(
            decide(&policy, "/dashboard/bogus/page", signed_in(Role::Admin)),
            redirect(GateRule::InvalidRole, "/dashboard/admin")
        );
        // Role names are case-sensitive.
        assert_eq!(
            decide(&policy, "/dashboard/Vendor", signed_in(Role::Vendor)),
            redirect(GateRule::InvalidRole, "/dashboard/vendor")
        );
    }
}

// --- Rule 4: auth pages for signed-in callers ---

#[test]
fn test_authenticated_caller_skips_auth_pages() {
    for policy in both_orders() {
        assert_eq!(
            decide(&policy, "/auth/login", signed_in(Role::Vendor)),
            redirect(GateRule::AuthBypass, "/dashboard/vendor")
        );
        assert_eq!(
            decide(&policy, "/auth", signed_in(Role::Admin)),
            redirect(GateRule::AuthBypass, "/dashboard/admin")
        );
    }
}

#[test]
fn test_anonymous_caller_sees_auth_pages() {
    for policy in both_orders() {
        assert_eq!(
            decide(&policy, "/auth/login", Session::default()),
            GateDecision::PassThrough
        );
        assert_eq!(
            decide(&policy, "/auth/signup", Session::default()),
            GateDecision::PassThrough
        );
    }
}

#[test]
fn test_auth_rule_matches_whole_segment() {
    let policy = GatePolicy::default();
    assert_eq!(
        decide(&policy, "/authors", signed_in(Role::Customer)),
        GateDecision::PassThrough
    );
}

// --- Rule 5: login required ---

#[test]
fn test_unauthenticated_dashboard_page_requires_login() {
    for policy in both_orders() {
        assert_eq!(
            decide(&policy, "/dashboard/customer/budget", Session::default()),
            redirect(GateRule::LoginRequired, "/auth/login")
        );
    }
}

#[test]
fn test_auth_first_checks_login_before_role() {
    let policy = policy(RuleOrder::AuthFirst);
    let anonymous_vendor = Session::new(Role::Vendor, false);

    for path in ["/dashboard", "/dashboard/admin/system", "/dashboard/bogus"] {
        assert_eq!(
            decide(&policy, path, anonymous_vendor),
            redirect(GateRule::LoginRequired, "/auth/login"),
            "{path}"
        );
    }
}

#[test]
fn test_role_first_corrects_role_before_login() {
    let policy = policy(RuleOrder::RoleFirst);
    let anonymous_vendor = Session::new(Role::Vendor, false);

    assert_eq!(
        decide(&policy, "/dashboard", anonymous_vendor),
        redirect(GateRule::DashboardRoot, "/dashboard/vendor")
    );
    assert_eq!(
        decide(&policy, "/dashboard/admin/system", anonymous_vendor),
        redirect(GateRule::RoleMismatch, "/dashboard/vendor/system")
    );
    assert_eq!(
        decide(&policy, "/dashboard/vendor/system", anonymous_vendor),
        redirect(GateRule::LoginRequired, "/auth/login")
    );
}

// --- Pass-through ---

#[test]
fn test_consistent_requests_pass_through() {
    for policy in both_orders() {
        for role in Role::ALL {
            let home = role.home_path();
            assert_eq!(
                decide(&policy, &home, signed_in(role)),
                GateDecision::PassThrough
            );
            assert_eq!(
                decide(&policy, &format!("{home}/settings"), signed_in(role)),
                GateDecision::PassThrough
            );
        }
        assert_eq!(decide(&policy, "/", Session::default()), GateDecision::PassThrough);
        assert_eq!(
            decide(&policy, "/pricing", Session::default()),
            GateDecision::PassThrough
        );
    }
}

// --- Convergence ---

/// Follows redirects the way a browser would and returns the final path.
fn follow(policy: &GatePolicy, start: &str, session: Session) -> String {
    let mut path = start.to_string();
    for _ in 0..4 {
        match decide(policy, &path, session) {
            GateDecision::PassThrough => return path,
            GateDecision::Redirect { location, .. } => path = location,
        }
    }
    panic!("redirect loop from {start} with {session:?} ({:?})", policy.order);
}

#[test]
fn test_redirects_converge_without_loops() {
    let paths = [
        "/",
        "/dashboard",
        "/dashboard/",
        "/dashboard/customer",
        "/dashboard/vendor/portfolio",
        "/dashboard/admin/system/logs",
        "/dashboard/bogus/page",
        "/auth",
        "/auth/login",
        "/auth/signup",
    ];

    for policy in both_orders() {
        for role in Role::ALL {
            for authenticated in [true, false] {
                let session = Session::new(role, authenticated);
                for path in paths {
                    let last = follow(&policy, path, session);
                    if path.starts_with("/dashboard") {
                        if authenticated {
                            assert!(
                                last.starts_with(&role.home_path()),
                                "{path} ended at {last} for {session:?}"
                            );
                        } else {
                            assert_eq!(last, "/auth/login", "{path} for {session:?}");
                        }
                    }
                }
            }
        }
    }
}

#[test]
fn test_redirect_target_is_idempotent() {
    let policy = GatePolicy::default();
    let session = signed_in(Role::Vendor);

    let first = decide(&policy, "/dashboard", session);
    let target = first.location().expect("root should redirect");
    assert_eq!(target, "/dashboard/vendor");
    assert_eq!(decide(&policy, target, session), GateDecision::PassThrough);
}
