use axum::{
    Form,
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    auth::{self, AuthResult},
    config::AppConfig,
    error::{AppError, found},
    models::LoginForm,
    templates::pages::{self, LoginMessage},
};

/// LoginPageQuery
///
/// Banner flags appended by redirects, e.g. `/login?unauthorized=True`.
/// Values are matched case-insensitively against `true`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoginPageQuery {
    /// Set after a failed login attempt.
    pub invalid: Option<String>,
    /// Set after logging out.
    pub logged_out: Option<String>,
    /// Set when a protected page was requested without a session.
    pub unauthorized: Option<String>,
}

fn flag(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

impl LoginPageQuery {
    pub fn message(&self) -> Option<LoginMessage> {
        if flag(&self.invalid) {
            Some(LoginMessage::Invalid)
        } else if flag(&self.unauthorized) {
            Some(LoginMessage::Unauthorized)
        } else if flag(&self.logged_out) {
            Some(LoginMessage::LoggedOut)
        } else {
            None
        }
    }
}

/// Gets the login page
///
/// Already-authenticated callers are sent straight to their reminders.
#[utoipa::path(
    get,
    path = "/login",
    tag = "Authentication",
    params(LoginPageQuery),
    responses(
        (status = 200, description = "Login page", content_type = "text/html", body = String),
        (status = 302, description = "Already logged in, redirect to /reminders")
    )
)]
pub async fn get_login_page(auth: AuthResult, Query(query): Query<LoginPageQuery>) -> Response {
    if auth.is_authenticated() {
        return found("/reminders");
    }
    Html(pages::login_page(query.message())).into_response()
}

/// Logs into the app
///
/// On success the signed session cookie is set and the caller is redirected to
/// `/reminders`; on failure back to `/login?invalid=True`.
#[utoipa::path(
    post,
    path = "/login",
    tag = "Authentication",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 302, description = "Redirect to /reminders or /login?invalid=True"))
)]
pub async fn post_login(
    State(config): State<AppConfig>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let username = form.username.trim();

    if !auth::verify_credentials(&config, username, &form.password) {
        tracing::info!(%username, "login rejected");
        return Ok(found("/login?invalid=True"));
    }

    let token = auth::issue_session_token(&config, username)?;
    cookies.add(auth::create_session_cookie(&config, &token));
    tracing::info!(%username, "user logged in");

    Ok(found("/reminders"))
}

/// Logs out of the app
#[utoipa::path(
    get,
    path = "/logout",
    tag = "Authentication",
    responses((status = 302, description = "Redirect to /login?logged_out=True"))
)]
pub async fn get_logout(auth: AuthResult, cookies: Cookies) -> Response {
    if let Some(cookie) = auth.cookie() {
        tracing::info!(username = %cookie.username, "user logged out");
    }
    cookies.add(auth::clear_session_cookie());
    found("/login?logged_out=True")
}
