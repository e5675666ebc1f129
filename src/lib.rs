use axum::{
    Router,
    extract::FromRef,
    http::HeaderName,
    middleware,
};
use tower_cookies::CookieManagerLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Routing identity and the role gate.
pub mod auth;
pub mod gate;

pub mod config;
pub mod handlers;
pub mod models;

// Route declarations (public pages, dashboards, API).
pub mod routes;
use routes::{api, dashboard, public};

// --- Public Re-exports ---

pub use auth::Session;
pub use config::AppConfig;
pub use gate::{GateDecision, GatePolicy, GateRequest, GateRule, RuleOrder};
pub use models::Role;

/// ApiDoc
///
/// OpenAPI document for the JSON endpoints under `/api`, served at
/// `/api-docs/openapi.json` and browsable at `/swagger-ui`.
#[derive(OpenApi)]
#[openapi(
    paths(handlers::login, handlers::logout, handlers::get_session),
    components(
        schemas(
            models::Role, models::LoginRequest, models::SessionResponse, models::DashboardView,
        )
    ),
    tags(
        (name = "wedding-gate", description = "Wedding planner routing session API")
    )
)]
struct ApiDoc;

/// AppState
///
/// Shared, immutable state cloned into every request.
#[derive(Clone, Default)]
pub struct AppState {
    pub config: AppConfig,
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// create_router
///
/// Assembles the routes, wraps them in the role gate and the cookie layer, then
/// applies the observability and CORS layers.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(dashboard::dashboard_routes())
        .nest("/api", api::api_routes())
        .fallback(handlers::not_found)
        // Covers the fallback too, so `/dashboard` is redirected even though no
        // route declares it.
        .layer(middleware::from_fn_with_state(state.clone(), gate::role_gate))
        // Must wrap the gate: `Session` reads the jar this layer installs.
        .layer(CookieManagerLayer::new())
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for `TraceLayer` carrying method, URI and the `x-request-id`, so every
/// log line of a request (gate decisions included) is correlated.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
