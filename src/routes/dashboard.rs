use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Dashboard Router Module
///
/// The protected subtree. The whole router is wrapped by the route guard middleware
/// (see `create_router`), which decides every navigation before these handlers run and
/// hands them the admitted identity through request extensions.
///
/// The routes are registered with their full paths rather than nested, so the guard
/// sees the same path the browser navigated to.
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        // GET /dashboard
        // The layout alone: identity and projected menu.
        .route("/dashboard", get(handlers::dashboard_home))
        .route("/dashboard/", get(handlers::dashboard_home))
        // GET /dashboard/{*segment}
        // Any view, e.g. /dashboard/doctor or /dashboard/payment/history.
        .route("/dashboard/{*segment}", get(handlers::dashboard_view))
}
