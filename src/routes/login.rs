use crate::{AppState, handlers::login};
use axum::{Router, routing::get};

/// Login Router
///
/// Session lifecycle. The handlers read the session themselves to decide where
/// to redirect, so no guard is applied.
pub fn login_routes() -> Router<AppState> {
    Router::new()
        // GET/POST /login
        // Shows the form (with an optional banner) and accepts its submission.
        .route("/login", get(login::get_login_page).post(login::post_login))
        // GET /logout
        // Clears the session cookie and redirects to /login?logged_out=True.
        .route("/logout", get(login::get_logout))
}
