use axum::{
    Router,
    extract::{FromRef, Request, State},
    http::HeaderName,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
};
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

// Access-control core.
pub mod auth;
pub mod guard;
pub mod identity;
pub mod menu;
pub mod navigation;
pub mod overview;
pub mod policy;
pub mod roles;

// HTTP surface.
pub mod config;
pub mod handlers;
pub mod models;

// Module for routing segregation (Public, Authenticated API, Guarded Dashboard).
pub mod routes;
use routes::{authenticated, dashboard, public};

// --- Public Re-exports ---

pub use auth::{CredentialStore, MemoryCredentialStore, RequestCredentials};
pub use config::AppConfig;
pub use guard::{Access, RouteGuard};
pub use identity::{Identity, IdentityResolver};
pub use navigation::{NavigationTree, check_consistency};
pub use policy::AccessPolicyTable;
pub use roles::{AliasPolicy, Role, RoleSet};

/// ApiDoc
///
/// Aggregates the handlers decorated with `#[utoipa::path]` and the schemas they use.
/// The resulting JSON is served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::public_page, handlers::get_session, handlers::get_menu,
        handlers::get_overview, handlers::dashboard_home, handlers::dashboard_view
    ),
    components(
        schemas(
            models::SessionResponse, models::OverviewResponse, models::DashboardView,
            models::PublicPage, menu::MenuItem, identity::Identity, identity::RoleSource,
            roles::Role, overview::Widget, policy::Icon,
        )
    ),
    tags(
        (name = "hospital-portal", description = "Hospital portal navigation and access API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The single, immutable container shared by every request: configuration plus the
/// access policy table and navigation tree. Both of the latter are built once per
/// process and only ever read.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub policy: &'static AccessPolicyTable,
    pub navigation: &'static NavigationTree,
}

impl AppState {
    /// State wired to the hospital portal's canonical policy and navigation tree.
    pub fn hospital(config: AppConfig) -> Self {
        Self {
            config,
            policy: AccessPolicyTable::hospital(),
            navigation: NavigationTree::hospital(),
        }
    }

    pub fn route_guard(&self) -> RouteGuard<'static> {
        RouteGuard::new(
            IdentityResolver::new(self.config.role_aliases),
            self.policy,
            self.navigation,
        )
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// route_guard_middleware
///
/// Decides every navigation into the dashboard subtree before its handler runs.
///
/// *Mechanism*: the guard resolves the identity from the request credentials and checks
/// it against the target's allowed roles. An admitted identity is inserted into the
/// request extensions for the view handler. A navigation without credential is
/// redirected to the login page; one with the wrong role (or to an undeclared view) is
/// redirected to the landing page. The view handler is never invoked in either case.
async fn route_guard_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let guard = state.route_guard();
    let credentials = RequestCredentials::from_headers(request.headers());
    let access = guard.evaluate(request.uri().path(), &credentials);

    if let Some(target) = guard.redirect_target(&access) {
        return Redirect::to(target).into_response();
    }

    if let Access::Granted(identity) = access {
        request.extensions_mut().insert(identity);
    }
    next.run(request).await
}

/// create_router
///
/// Assembles the routing structure, applies global and scoped middleware, and registers
/// the application state.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Serve the auto-generated Swagger UI.
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Public Routes: No middleware applied.
        .merge(public::public_routes())
        // Authenticated API: each handler authenticates through `CurrentIdentity`.
        .merge(authenticated::authenticated_routes())
        // Dashboard: every navigation passes the route guard first.
        .merge(
            dashboard::dashboard_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                route_guard_middleware,
            )),
        )
        // Anything else goes back to the landing page.
        .fallback(handlers::fallback)
        .with_state(state);

    // 3. Observability and Correlation Layers
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
        // 4. CORS Layer
        .layer(cors)
}

/// trace_span_logger
///
/// Builds the tracing span of a request: method, uri and the `x-request-id` set by
/// `SetRequestIdLayer`, so every log line of one request can be correlated.
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
