use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthCookie,
    error::AppError,
    models::{
        NewReminderItemRequest, ReminderItem, ReminderList, ReminderListRequest,
        UpdateReminderItemRequest, clean_text,
    },
};

const LIST_NOT_FOUND: &str = "Reminder list not found";
const ITEM_NOT_FOUND: &str = "Reminder item not found";

fn list_not_found() -> AppError {
    AppError::NotFound(LIST_NOT_FOUND.to_string())
}

fn item_not_found() -> AppError {
    AppError::NotFound(ITEM_NOT_FOUND.to_string())
}

// --- Reminder Lists ---

/// Gets all reminder lists for the user
#[utoipa::path(
    get,
    path = "/api/reminders",
    tag = "API",
    responses(
        (status = 200, description = "The caller's reminder lists", body = [ReminderList]),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_reminder_lists(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReminderList>>, AppError> {
    let lists = state.repo.get_lists(&user.username).await?;
    Ok(Json(lists))
}

/// Creates a new reminder list
#[utoipa::path(
    post,
    path = "/api/reminders",
    tag = "API",
    request_body = ReminderListRequest,
    responses(
        (status = 201, description = "Created", body = ReminderList),
        (status = 422, description = "Blank name")
    )
)]
pub async fn create_reminder_list(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Json(payload): Json<ReminderListRequest>,
) -> Result<(StatusCode, Json<ReminderList>), AppError> {
    let name = clean_text(&payload.name, "name")?;
    let list = state.repo.create_list(&user.username, &name).await?;
    tracing::info!(username = %user.username, list_id = %list.id, "reminder list created");
    Ok((StatusCode::CREATED, Json(list)))
}

/// Gets a reminder list by ID
#[utoipa::path(
    get,
    path = "/api/reminders/{list_id}",
    tag = "API",
    params(("list_id" = Uuid, Path, description = "Reminder list ID")),
    responses(
        (status = 200, description = "Found", body = ReminderList),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_reminder_list(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
) -> Result<Json<ReminderList>, AppError> {
    state
        .repo
        .get_list(&user.username, list_id)
        .await?
        .map(Json)
        .ok_or_else(list_not_found)
}

/// Renames a reminder list
#[utoipa::path(
    patch,
    path = "/api/reminders/{list_id}",
    tag = "API",
    params(("list_id" = Uuid, Path, description = "Reminder list ID")),
    request_body = ReminderListRequest,
    responses(
        (status = 200, description = "Renamed", body = ReminderList),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Blank name")
    )
)]
pub async fn update_reminder_list(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    Json(payload): Json<ReminderListRequest>,
) -> Result<Json<ReminderList>, AppError> {
    let name = clean_text(&payload.name, "name")?;
    state
        .repo
        .rename_list(&user.username, list_id, &name)
        .await?
        .map(Json)
        .ok_or_else(list_not_found)
}

/// Deletes a reminder list and all of its items
#[utoipa::path(
    delete,
    path = "/api/reminders/{list_id}",
    tag = "API",
    params(("list_id" = Uuid, Path, description = "Reminder list ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_reminder_list(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.repo.delete_list(&user.username, list_id).await? {
        return Err(list_not_found());
    }
    tracing::info!(username = %user.username, %list_id, "reminder list deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- Reminder Items ---

/// Gets all items in a reminder list
#[utoipa::path(
    get,
    path = "/api/reminders/{list_id}/items",
    tag = "API",
    params(("list_id" = Uuid, Path, description = "Reminder list ID")),
    responses(
        (status = 200, description = "Items of the list", body = [ReminderItem]),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_reminder_items(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
) -> Result<Json<Vec<ReminderItem>>, AppError> {
    // An unknown list is a 404, not an empty array.
    if state.repo.get_list(&user.username, list_id).await?.is_none() {
        return Err(list_not_found());
    }
    let items = state.repo.get_items(&user.username, list_id).await?;
    Ok(Json(items))
}

/// Adds an item to a reminder list
#[utoipa::path(
    post,
    path = "/api/reminders/{list_id}/items",
    tag = "API",
    params(("list_id" = Uuid, Path, description = "Reminder list ID")),
    request_body = NewReminderItemRequest,
    responses(
        (status = 201, description = "Created", body = ReminderItem),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Blank description")
    )
)]
pub async fn create_reminder_item(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    Json(payload): Json<NewReminderItemRequest>,
) -> Result<(StatusCode, Json<ReminderItem>), AppError> {
    let description = clean_text(&payload.description, "description")?;
    let item = state
        .repo
        .create_item(&user.username, list_id, &description)
        .await?
        .ok_or_else(list_not_found)?;
    tracing::debug!(username = %user.username, item_id = %item.id, "reminder item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// Gets a reminder item by ID
#[utoipa::path(
    get,
    path = "/api/items/{item_id}",
    tag = "API",
    params(("item_id" = Uuid, Path, description = "Reminder item ID")),
    responses(
        (status = 200, description = "Found", body = ReminderItem),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get_reminder_item(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<ReminderItem>, AppError> {
    state
        .repo
        .get_item(&user.username, item_id)
        .await?
        .map(Json)
        .ok_or_else(item_not_found)
}

/// Updates a reminder item's description or completion
#[utoipa::path(
    patch,
    path = "/api/items/{item_id}",
    tag = "API",
    params(("item_id" = Uuid, Path, description = "Reminder item ID")),
    request_body = UpdateReminderItemRequest,
    responses(
        (status = 200, description = "Updated", body = ReminderItem),
        (status = 404, description = "Not Found"),
        (status = 422, description = "Blank description")
    )
)]
pub async fn update_reminder_item(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<UpdateReminderItemRequest>,
) -> Result<Json<ReminderItem>, AppError> {
    let update = UpdateReminderItemRequest {
        description: payload
            .description
            .as_deref()
            .map(|raw| clean_text(raw, "description"))
            .transpose()?,
        completed: payload.completed,
    };
    state
        .repo
        .update_item(&user.username, item_id, update)
        .await?
        .map(Json)
        .ok_or_else(item_not_found)
}

/// Deletes a reminder item
#[utoipa::path(
    delete,
    path = "/api/items/{item_id}",
    tag = "API",
    params(("item_id" = Uuid, Path, description = "Reminder item ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete_reminder_item(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.repo.delete_item(&user.username, item_id).await? {
        return Err(item_not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}
