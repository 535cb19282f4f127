use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Authenticated Router Module
///
/// The JSON API the frontend calls to render its layout. These are data requests, not
/// navigations: a missing credential is answered with 401 by the `CurrentIdentity`
/// extractor instead of a redirect.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // GET /api/v1/session
        // The resolved identity and the label of its role.
        .route("/api/v1/session", get(handlers::get_session))
        // GET /api/v1/menu
        // The sidebar entries visible to the caller's role, in menu order.
        .route("/api/v1/menu", get(handlers::get_menu))
        // GET /api/v1/overview
        // The overview cards of the caller's role and where their statistics come from.
        .route("/api/v1/overview", get(handlers::get_overview))
}
