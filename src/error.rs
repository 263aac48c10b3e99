use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Path prefix that marks machine-facing routes.
///
/// The API guard and the not-found presentation both key off this value.
pub const API_PREFIX: &str = "/api/";

/// Where browsers land when a page does not exist.
pub const NOT_FOUND_PAGE: &str = "/not-found";

/// Where browsers land when a guarded page is requested without a session.
pub const UNAUTHORIZED_REDIRECT: &str = "/login?unauthorized=True";

/// Errors raised by the storage layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// AppError
///
/// Errors a handler can return. Every variant renders as a JSON body of the form
/// `{"detail": "..."}` so API clients always receive a machine-readable error.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("Not authenticated")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("session error: {0}")]
    Session(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Repository(_) | AppError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = match &self {
            AppError::Repository(_) | AppError::Session(_) => {
                // Internal details stay in the logs.
                tracing::error!(error = %self, "request failed");
                "Internal Server Error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// NotFoundResponse
///
/// How a 404 is presented to the caller. API clients get the JSON detail, browser
/// navigations get redirected to the friendly not-found page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundResponse {
    Json,
    Redirect,
}

impl NotFoundResponse {
    pub fn for_path(path: &str) -> Self {
        if path.starts_with(API_PREFIX) {
            NotFoundResponse::Json
        } else {
            NotFoundResponse::Redirect
        }
    }
}

/// A `302 Found` redirect.
///
/// `axum::response::Redirect` only offers 303/307/308, while browsers and the
/// login flow expect a plain 302.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
