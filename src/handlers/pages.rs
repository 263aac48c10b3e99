use axum::{
    extract::{Request, State},
    response::{Html, IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::{
    auth::AuthResult,
    config::AppConfig,
    error::{AppError, found},
    templates::pages,
};

/// Redirects to the login or reminders pages
///
/// Logged-in callers go to `/reminders`, everyone else to `/login`.
#[utoipa::path(
    get,
    path = "/",
    tag = "Pages",
    responses((status = 302, description = "Redirect to /reminders or /login"))
)]
pub async fn read_root(auth: AuthResult) -> Response {
    let path = if auth.is_authenticated() { "/reminders" } else { "/login" };
    found(path)
}

/// get_favicon
///
/// Serves `{static_dir}/img/favicon.ico` through `ServeFile`, like the `/static` mount.
/// Not part of the OpenAPI document. A missing file is a plain 404.
pub async fn get_favicon(State(config): State<AppConfig>, request: Request) -> Response {
    match ServeFile::new(config.favicon_path()).oneshot(request).await {
        Ok(response) => response.into_response(),
        Err(never) => match never {},
    }
}

/// Gets the "Not Found" page
#[utoipa::path(
    get,
    path = "/not-found",
    tag = "Pages",
    responses((status = 200, description = "Not Found page", content_type = "text/html", body = String))
)]
pub async fn get_not_found(auth: AuthResult) -> Html<String> {
    let username = auth.cookie().map(|cookie| cookie.username.as_str());
    Html(pages::not_found_page(username))
}

/// Fallback for unmatched routes. The not-found translation layer decides
/// whether the caller sees this JSON body or a redirect.
pub async fn fallback() -> AppError {
    AppError::NotFound("Not Found".to_string())
}
