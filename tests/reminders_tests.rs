use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use bulldoggy::{
    AppConfig, AppState, MemoryRepository,
    auth::issue_session_token,
    create_router,
    repository::{Repository, RepositoryState},
};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

const USER: &str = "pythonista";

struct TestApp {
    router: Router,
    repo: Arc<MemoryRepository>,
}

impl TestApp {
    fn new() -> Self {
        let repo = Arc::new(MemoryRepository::new());
        let router = create_router(AppState {
            repo: repo.clone() as RepositoryState,
            config: AppConfig::default(),
        });
        Self { router, repo }
    }

    async fn send(&self, method: Method, uri: &str, form: Option<&str>) -> Response {
        let token = issue_session_token(&AppConfig::default(), USER).unwrap();
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, format!("reminders_session={token}"));

        let body = match form {
            Some(form) => {
                builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
                Body::from(form.to_string())
            }
            None => Body::empty(),
        };

        self.router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap()
    }

    async fn html(&self, method: Method, uri: &str, form: Option<&str>) -> String {
        let response = self.send(method, uri, form).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }
}

// --- Page ---

#[tokio::test]
async fn test_reminders_page_shows_lists_and_selection() {
    let app = TestApp::new();
    let chores = app.repo.create_list(USER, "Chores").await.unwrap();
    app.repo.create_list(USER, "Errands").await.unwrap();
    app.repo.create_item(USER, chores.id, "Sweep").await.unwrap();
    app.repo.set_selected_list(USER, Some(chores.id)).await.unwrap();

    let html = app.html(Method::GET, "/reminders", None).await;

    assert!(html.contains("Chores"));
    assert!(html.contains("Errands"));
    assert!(html.contains("Sweep"));
    assert!(html.contains("list-row selected"));
    assert!(html.contains("Logged in as <strong>pythonista</strong>"));
}

#[tokio::test]
async fn test_reminders_page_without_selection_shows_hint() {
    let app = TestApp::new();

    let html = app.html(Method::GET, "/reminders", None).await;

    assert!(html.contains("Select a list to see its reminders."));
}

// --- List Partials ---

#[tokio::test]
async fn test_new_list_row_is_escaped() {
    let app = TestApp::new();

    let html = app
        .html(Method::POST, "/reminders/new-list-row", Some("name=%3Cb%3EBold%3C%2Fb%3E"))
        .await;

    assert!(html.contains("&lt;b&gt;Bold&lt;/b&gt;"));
    assert!(!html.contains("<b>"));
    assert_eq!(app.repo.get_lists(USER).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_list_row_edit_and_rename() {
    let app = TestApp::new();
    let list = app.repo.create_list(USER, "Old").await.unwrap();

    let edit = app
        .html(Method::GET, &format!("/reminders/list-row-edit/{}", list.id), None)
        .await;
    assert!(edit.contains(r#"value="Old""#));

    let row = app
        .html(
            Method::PATCH,
            &format!("/reminders/list-row-name/{}", list.id),
            Some("name=New"),
        )
        .await;
    assert!(row.contains("New"));

    let stored = app.repo.get_list(USER, list.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "New");
}

#[tokio::test]
async fn test_blank_rename_is_rejected() {
    let app = TestApp::new();
    let list = app.repo.create_list(USER, "Keep").await.unwrap();

    let response = app
        .send(
            Method::PATCH,
            &format!("/reminders/list-row-name/{}", list.id),
            Some("name=++"),
        )
        .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let stored = app.repo.get_list(USER, list.id).await.unwrap().unwrap();
    assert_eq!(stored.name, "Keep");
}

#[tokio::test]
async fn test_delete_list_row_returns_empty_body() {
    let app = TestApp::new();
    let list = app.repo.create_list(USER, "Gone").await.unwrap();

    let html = app
        .html(Method::DELETE, &format!("/reminders/list-row/{}", list.id), None)
        .await;

    assert!(html.is_empty());
    assert!(app.repo.get_list(USER, list.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_select_list_returns_items_panel() {
    let app = TestApp::new();
    let list = app.repo.create_list(USER, "Groceries").await.unwrap();
    app.repo.create_item(USER, list.id, "Eggs").await.unwrap();

    let html = app
        .html(Method::POST, &format!("/reminders/select/{}", list.id), None)
        .await;

    assert!(html.contains(r#"id="reminder-items""#));
    assert!(html.contains("Eggs"));
    assert_eq!(app.repo.get_selected_list(USER).await.unwrap(), Some(list.id));
}

#[tokio::test]
async fn test_select_list_moves_selected_row() {
    let app = TestApp::new();
    let chores = app.repo.create_list(USER, "Chores").await.unwrap();
    let groceries = app.repo.create_list(USER, "Groceries").await.unwrap();

    app.html(Method::POST, &format!("/reminders/select/{}", chores.id), None)
        .await;
    let html = app
        .html(Method::POST, &format!("/reminders/select/{}", groceries.id), None)
        .await;

    assert!(html.contains(r#"<div id="reminder-lists" hx-swap-oob="innerHTML">"#));
    assert_eq!(html.matches("list-row selected").count(), 1);
    assert!(html.contains(&format!(
        r#"id="list-row-{}" class="list-row selected""#,
        groceries.id
    )));
    assert!(html.contains(&format!(r#"id="list-row-{}" class="list-row""#, chores.id)));
}

// --- Item Partials ---

#[tokio::test]
async fn test_item_row_lifecycle() {
    let app = TestApp::new();
    let list = app.repo.create_list(USER, "Garden").await.unwrap();

    let row = app
        .html(
            Method::POST,
            &format!("/reminders/new-item-row/{}", list.id),
            Some("description=Water+plants"),
        )
        .await;
    assert!(row.contains("Water plants"));

    let item = app.repo.get_items(USER, list.id).await.unwrap().remove(0);
    let row_uri = format!("/reminders/item-row/{}", item.id);

    let edit = app
        .html(Method::GET, &format!("/reminders/item-row-edit/{}", item.id), None)
        .await;
    assert!(edit.contains(r#"value="Water plants""#));

    let row = app
        .html(
            Method::PATCH,
            &format!("/reminders/item-row-description/{}", item.id),
            Some("description=Mow+lawn"),
        )
        .await;
    assert!(row.contains("Mow lawn"));

    let row = app.html(Method::GET, &row_uri, None).await;
    assert!(row.contains("Mow lawn"));

    let deleted = app.html(Method::DELETE, &row_uri, None).await;
    assert!(deleted.is_empty());
    assert!(app.repo.get_item(USER, item.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_strike_toggles_completion() {
    let app = TestApp::new();
    let list = app.repo.create_list(USER, "Errands").await.unwrap();
    let item = app.repo.create_item(USER, list.id, "Post office").await.unwrap().unwrap();
    let uri = format!("/reminders/item-row-strike/{}", item.id);

    let struck = app.html(Method::PATCH, &uri, None).await;
    assert!(struck.contains("<s>Post office</s>"));
    assert!(app.repo.get_item(USER, item.id).await.unwrap().unwrap().completed);

    let unstruck = app.html(Method::PATCH, &uri, None).await;
    assert!(!unstruck.contains("<s>"));
    assert!(!app.repo.get_item(USER, item.id).await.unwrap().unwrap().completed);
}

#[tokio::test]
async fn test_new_item_for_unknown_list_redirects_to_not_found() {
    let app = TestApp::new();

    let response = app
        .send(
            Method::POST,
            &format!("/reminders/new-item-row/{}", Uuid::new_v4()),
            Some("description=Orphan"),
        )
        .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/not-found");
}
