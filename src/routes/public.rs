use crate::{AppState, handlers};
use axum::{Router, routing::get};

/// Public Router Module
///
/// Endpoints of the public subtree. No identity is resolved for them and no guard is
/// applied.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Monitoring and load balancer checks.
        .route("/health", get(|| async { "ok" }))
        // GET /, /login, /register
        // Landing page and the authentication entry points.
        .route("/", get(handlers::public_page))
        .route("/login", get(handlers::public_page))
        .route("/register", get(handlers::public_page))
}
