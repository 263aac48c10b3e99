use crate::{AppState, handlers::pages};
use axum::{Router, routing::get};

/// Pages Router
///
/// Routes that are reachable with or without a session.
pub fn pages_routes() -> Router<AppState> {
    Router::new()
        // GET /
        // Redirects to /reminders when logged in, /login otherwise.
        .route("/", get(pages::read_root))
        // GET /favicon.ico
        // Browsers ask for this on every page load. Not part of the OpenAPI document.
        .route("/favicon.ico", get(pages::get_favicon))
        // GET /not-found
        // Target of every non-API 404.
        .route("/not-found", get(pages::get_not_found))
}
