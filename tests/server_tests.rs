use bulldoggy::{AppConfig, AppState, MemoryRepository, create_router, repository::RepositoryState};
use reqwest::{StatusCode, header, redirect::Policy};
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
}

/// Serves the app on a random port and returns a cookie-less client that does
/// not follow redirects, so each hop can be asserted.
async fn spawn_app() -> TestApp {
    let repo = Arc::new(MemoryRepository::new()) as RepositoryState;
    let config = AppConfig {
        static_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/static").to_string(),
        ..Default::default()
    };
    let router = create_router(AppState { repo, config });

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .build()
        .unwrap();

    TestApp { address, client }
}

fn location(response: &reqwest::Response) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

#[tokio::test]
async fn test_browser_login_journey() {
    let app = spawn_app().await;

    // Anonymous visit to a page bounces to the login form.
    let response = app
        .client
        .get(format!("{}/reminders", app.address))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/login?unauthorized=True");

    // Log in and carry the session cookie by hand.
    let response = app
        .client
        .post(format!("{}/login", app.address))
        .form(&[("username", "engineer"), ("password", "Muh5devices")])
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/reminders");

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    let session = set_cookie.split(';').next().unwrap().to_string();

    let response = app
        .client
        .get(format!("{}/reminders", app.address))
        .header(header::COOKIE, &session)
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("engineer"));

    let response = app
        .client
        .get(format!("{}/api/reminders", app.address))
        .header(header::COOKIE, &session)
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), StatusCode::OK);
    let lists: Vec<serde_json::Value> = response.json().await.unwrap();
    assert!(lists.is_empty());
}

#[tokio::test]
async fn test_not_found_presentation_over_http() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(format!("{}/api/nothing/here", app.address))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["detail"], "Not Found");

    let response = app
        .client
        .get(format!("{}/nothing/here", app.address))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/not-found");
}

#[tokio::test]
async fn test_docs_are_served() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(format!("{}/openapi.json", app.address))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), StatusCode::OK);
    let schema: serde_json::Value = response.json().await.unwrap();
    assert_eq!(schema["info"]["version"], "1.0.0");

    let response = app
        .client
        .get(format!("{}/docs/", app.address))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .client
        .get(format!("{}/redoc", app.address))
        .send()
        .await
        .expect("req fail");
    assert_eq!(response.status(), StatusCode::OK);
}
