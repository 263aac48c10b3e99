use std::sync::OnceLock;

use axum::{
    Router,
    extract::{FromRef, Request},
    http::{HeaderName, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_cookies::CookieManagerLayer;
use utoipa::{Modify, OpenApi, openapi::extensions::ExtensionsBuilder};
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod templates;

// One router per area of the app (Pages, Login, API, Reminders).
pub mod routes;
use routes::{api, login, pages, reminders};

use auth::AuthResult;
use error::{AppError, NOT_FOUND_PAGE, NotFoundResponse, UNAUTHORIZED_REDIRECT, found};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use repository::{MemoryRepository, PostgresRepository, RepositoryState};

/// Path of the x-logo shown by documentation viewers.
pub const LOGO_URL: &str = "static/img/logos/bulldoggy-500px.png";

/// ApiDoc
///
/// Aggregates every `#[utoipa::path]` handler and `ToSchema` model into the
/// OpenAPI document. The favicon route is intentionally absent.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bulldoggy: The Reminders App",
        version = "1.0.0",
        description = "Bulldoggy is a web app for tracking reminders.\n\
            It is a full-stack Rust app built using axum and HTMX.\n\
            It is meant to be an \"example\" or \"demo\" app used for instructional purposes."
    ),
    paths(
        handlers::pages::read_root, handlers::pages::get_not_found,
        handlers::login::get_login_page, handlers::login::post_login, handlers::login::get_logout,
        handlers::api::get_reminder_lists, handlers::api::create_reminder_list,
        handlers::api::get_reminder_list, handlers::api::update_reminder_list,
        handlers::api::delete_reminder_list, handlers::api::get_reminder_items,
        handlers::api::create_reminder_item, handlers::api::get_reminder_item,
        handlers::api::update_reminder_item, handlers::api::delete_reminder_item,
        handlers::reminders::get_reminders_page,
        handlers::reminders::get_list_row, handlers::reminders::delete_list_row,
        handlers::reminders::get_list_row_edit, handlers::reminders::patch_list_row_name,
        handlers::reminders::post_new_list_row, handlers::reminders::post_select_list,
        handlers::reminders::get_item_row, handlers::reminders::delete_item_row,
        handlers::reminders::get_item_row_edit, handlers::reminders::patch_item_row_description,
        handlers::reminders::patch_item_row_strike, handlers::reminders::post_new_item_row
    ),
    components(
        schemas(
            models::ReminderList, models::ReminderItem, models::ReminderListRequest,
            models::NewReminderItemRequest, models::UpdateReminderItemRequest,
            models::LoginForm, models::ListNameForm, models::ItemDescriptionForm,
        )
    ),
    tags(
        (name = "API", description = "Backend API routes for managing reminder lists and items."),
        (name = "Pages", description = "The main Bulldoggy web pages."),
        (name = "Authentication", description = "Routes for logging into and out of the app."),
        (name = "HTMX Partials", description = "Routes that serve partial web page contents for HTMX-based requests.")
    ),
    modifiers(&LogoAddon)
)]
struct ApiDoc;

/// Adds `info.x-logo` to the generated document.
struct LogoAddon;

impl Modify for LogoAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.extensions = Some(
            ExtensionsBuilder::new()
                .add("x-logo", json!({ "url": LOGO_URL }))
                .build(),
        );
    }
}

static OPENAPI_SCHEMA: OnceLock<utoipa::openapi::OpenApi> = OnceLock::new();

/// openapi_schema
///
/// Builds the OpenAPI document on first use and hands out the same instance for
/// the rest of the process. Concurrent first calls race on the cell, only one
/// value is ever stored.
pub fn openapi_schema() -> &'static utoipa::openapi::OpenApi {
    OPENAPI_SCHEMA.get_or_init(ApiDoc::openapi)
}

/// AppState
///
/// Shared, immutable container for the services every request needs.
#[derive(Clone)]
pub struct AppState {
    /// Reminder storage (Postgres or in-memory).
    pub repo: RepositoryState,
    /// The loaded environment configuration.
    pub config: AppConfig,
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for RepositoryState {
    fn from_ref(app_state: &AppState) -> RepositoryState {
        app_state.repo.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// page_guard
///
/// Guard for the Reminders router. Authenticated requests continue with the
/// `AuthCookie` stored as a request extension; anonymous ones are redirected
/// to `/login?unauthorized=True`.
async fn page_guard(auth: AuthResult, mut request: Request, next: Next) -> Response {
    match auth {
        AuthResult::Authenticated(cookie) => {
            request.extensions_mut().insert(cookie);
            next.run(request).await
        }
        AuthResult::Unauthenticated => {
            tracing::debug!(path = %request.uri().path(), "anonymous page request redirected to login");
            found(UNAUTHORIZED_REDIRECT)
        }
    }
}

/// api_guard
///
/// Guard for the API router. Same as `page_guard`, but anonymous callers get a
/// JSON 401 instead of a redirect.
async fn api_guard(auth: AuthResult, mut request: Request, next: Next) -> Response {
    match auth {
        AuthResult::Authenticated(cookie) => {
            request.extensions_mut().insert(cookie);
            next.run(request).await
        }
        AuthResult::Unauthenticated => AppError::Unauthorized.into_response(),
    }
}

/// translate_not_found
///
/// Presents every 404 according to the request path. Under `/api/` the caller
/// gets a JSON `{"detail": ...}` body (a handler's own detail is kept), anywhere
/// else a 302 to `/not-found`.
async fn translate_not_found(request: Request, next: Next) -> Response {
    let presentation = NotFoundResponse::for_path(request.uri().path());
    let response = next.run(request).await;

    if response.status() != StatusCode::NOT_FOUND {
        return response;
    }

    match presentation {
        NotFoundResponse::Redirect => found(NOT_FOUND_PAGE),
        NotFoundResponse::Json => {
            let is_json = response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .is_some_and(|value| value.starts_with("application/json"));
            if is_json {
                response
            } else {
                AppError::NotFound("Not Found".to_string()).into_response()
            }
        }
    }
}

/// create_router
///
/// Assembles the whole application: routers, guards, static files, docs, the
/// not-found translation and the observability layers.
pub fn create_router(state: AppState) -> Router {
    // 1. CORS Configuration
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    // Header name constant for Request Correlation.
    let x_request_id = HeaderName::from_static("x-request-id");

    let static_files = ServeDir::new(&state.config.static_dir);

    // 2. Base Router Assembly
    let base_router = Router::new()
        // Documentation: Swagger UI and ReDoc over the cached schema. ReDoc renders `x-logo`.
        .merge(SwaggerUi::new("/docs").url("/openapi.json", openapi_schema().clone()))
        .merge(Redoc::with_url("/redoc", openapi_schema().clone()))
        .merge(pages::pages_routes())
        .merge(login::login_routes())
        .merge(
            api::api_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), api_guard)),
        )
        .merge(
            reminders::reminders_routes()
                .route_layer(middleware::from_fn_with_state(state.clone(), page_guard)),
        )
        .nest_service("/static", static_files)
        .fallback(handlers::pages::fallback)
        .with_state(state)
        .layer(middleware::from_fn(translate_not_found))
        // Session cookies must be readable by the guards above.
        .layer(CookieManagerLayer::new());

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
/// Builds the per-request span so every log line carries the method, URI and
/// the `x-request-id` assigned above.
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
