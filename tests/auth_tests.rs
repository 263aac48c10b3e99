use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use bulldoggy::{
    AppConfig, AppState, MemoryRepository,
    auth::{
        Claims, SESSION_COOKIE_NAME, create_session_cookie, decode_session_token,
        issue_session_token, verify_credentials,
    },
    config::Env,
    create_router,
    error::AppError,
    repository::RepositoryState,
};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::sync::Arc;
use tower::ServiceExt;

// --- Helpers ---

fn test_app() -> Router {
    app_with_config(AppConfig::default())
}

fn app_with_config(config: AppConfig) -> Router {
    let repo = Arc::new(MemoryRepository::new()) as RepositoryState;
    create_router(AppState { repo, config })
}

/// A lifetime that `AppConfig::load` would refuse, but that a hand-built config can still carry.
fn oversized_config() -> AppConfig {
    AppConfig {
        session_max_age_hours: 10_000_000_000,
        ..Default::default()
    }
}

fn create_token(secret: &str, sub: &str, exp_offset_secs: i64) -> String {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        iat: now,
        exp: now + exp_offset_secs,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

async fn send(request: Request<Body>) -> Response {
    test_app().oneshot(request).await.unwrap()
}

async fn post_login(username: &str, password: &str) -> Response {
    let form = format!("username={username}&password={password}");
    send(
        Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap(),
    )
    .await
}

fn location(response: &Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

fn set_cookie(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .map(|value| value.to_str().unwrap())
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

// --- Session Tokens ---

#[test]
fn test_issued_token_round_trips() {
    let config = AppConfig::default();
    let token = issue_session_token(&config, "pythonista").unwrap();

    let cookie = decode_session_token(&config, &token).expect("valid session");
    assert_eq!(cookie.username, "pythonista");
}

#[test]
fn test_expired_token_is_rejected() {
    let config = AppConfig::default();
    let token = create_token(&config.session_secret, "pythonista", -3600);

    assert!(decode_session_token(&config, &token).is_none());
}

#[test]
fn test_token_with_wrong_secret_is_rejected() {
    let config = AppConfig::default();
    let token = create_token("some-other-secret", "pythonista", 3600);

    assert!(decode_session_token(&config, &token).is_none());
}

#[test]
fn test_token_for_unknown_user_is_rejected() {
    let config = AppConfig::default();
    let token = create_token(&config.session_secret, "mallory", 3600);

    assert!(decode_session_token(&config, &token).is_none());
}

#[test]
fn test_oversized_max_age_is_a_session_error() {
    let result = issue_session_token(&oversized_config(), "pythonista");

    assert!(matches!(result, Err(AppError::Session(_))));
}

// --- Credentials & Cookies ---

#[test]
fn test_verify_credentials() {
    let config = AppConfig::default();

    assert!(verify_credentials(&config, "pythonista", "I<3testing"));
    assert!(!verify_credentials(&config, "pythonista", "wrong"));
    assert!(!verify_credentials(&config, "pythonista", ""));
    assert!(!verify_credentials(&config, "nobody", "I<3testing"));
}

#[test]
fn test_session_cookie_attributes() {
    let local = AppConfig::default();
    let cookie = create_session_cookie(&local, "token");

    assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    assert_ne!(cookie.secure(), Some(true));

    let production = AppConfig {
        env: Env::Production,
        ..Default::default()
    };
    assert_eq!(create_session_cookie(&production, "token").secure(), Some(true));
}

#[test]
fn test_session_cookie_with_oversized_max_age() {
    let cookie = create_session_cookie(&oversized_config(), "token");

    assert!(cookie.max_age().is_some_and(|max_age| max_age.is_positive()));
}

// --- Login Flow ---

#[tokio::test]
async fn test_login_success_sets_cookie() {
    // `<` must be form-encoded.
    let response = post_login("pythonista", "I%3C3testing").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/reminders");
    let cookie = set_cookie(&response).expect("session cookie");
    assert!(cookie.starts_with("reminders_session="));
    assert!(cookie.contains("HttpOnly"));
}

#[tokio::test]
async fn test_login_failure_redirects_with_flag() {
    let response = post_login("pythonista", "nope").await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/login?invalid=True");
    assert!(set_cookie(&response).is_none());
}

#[tokio::test]
async fn test_login_page_banners() {
    let cases = [
        ("/login?invalid=True", "Invalid username or password."),
        ("/login?unauthorized=True", "Please log in to continue."),
        ("/login?logged_out=true", "You have been logged out."),
    ];

    for (uri, banner) in cases {
        let response = send(Request::builder().uri(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_text(response).await.contains(banner), "{uri}");
    }
}

#[tokio::test]
async fn test_login_page_redirects_when_logged_in() {
    let token = issue_session_token(&AppConfig::default(), "engineer").unwrap();
    let response = send(
        Request::builder()
            .uri("/login")
            .header(header::COOKIE, format!("reminders_session={token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/reminders");
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let token = issue_session_token(&AppConfig::default(), "engineer").unwrap();
    let response = send(
        Request::builder()
            .uri("/logout")
            .header(header::COOKIE, format!("reminders_session={token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/login?logged_out=True");
    let cookie = set_cookie(&response).expect("clearing cookie");
    assert!(cookie.starts_with("reminders_session=;"));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_login_with_oversized_max_age_fails_cleanly() {
    let response = app_with_config(oversized_config())
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("username=pythonista&password=I%3C3testing"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(set_cookie(&response).is_none());
    assert!(body_text(response).await.contains("Internal Server Error"));
}
