use axum::{
    Extension, Form,
    extract::{Path, State},
    response::Html,
};
use uuid::Uuid;

use crate::{
    AppState,
    auth::AuthCookie,
    error::AppError,
    models::{ItemDescriptionForm, ListNameForm, ReminderItem, ReminderList, UpdateReminderItemRequest, clean_text},
    templates::{pages, partials},
};

// Unknown ids here end up as a redirect to the not-found page.
async fn owned_list(state: &AppState, user: &AuthCookie, list_id: Uuid) -> Result<ReminderList, AppError> {
    state
        .repo
        .get_list(&user.username, list_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Reminder list not found".to_string()))
}

async fn owned_item(state: &AppState, user: &AuthCookie, item_id: Uuid) -> Result<ReminderItem, AppError> {
    state
        .repo
        .get_item(&user.username, item_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Reminder item not found".to_string()))
}

async fn is_selected(state: &AppState, user: &AuthCookie, list_id: Uuid) -> Result<bool, AppError> {
    Ok(state.repo.get_selected_list(&user.username).await? == Some(list_id))
}

// --- Pages ---

/// Gets the reminders page
///
/// Shows every list of the user and the items of the currently selected list.
#[utoipa::path(
    get,
    path = "/reminders",
    tag = "Pages",
    responses(
        (status = 200, description = "Reminders page", content_type = "text/html", body = String),
        (status = 302, description = "Not logged in, redirect to /login?unauthorized=True")
    )
)]
pub async fn get_reminders_page(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
) -> Result<Html<String>, AppError> {
    let lists = state.repo.get_lists(&user.username).await?;
    let selected_id = state.repo.get_selected_list(&user.username).await?;
    let selected = lists.iter().find(|list| Some(list.id) == selected_id);

    let items = match selected {
        Some(list) => state.repo.get_items(&user.username, list.id).await?,
        None => Vec::new(),
    };

    Ok(Html(pages::reminders_page(&user.username, &lists, selected, &items)))
}

// --- List Partials ---

/// Gets a reminder list row
#[utoipa::path(
    get,
    path = "/reminders/list-row/{list_id}",
    tag = "HTMX Partials",
    params(("list_id" = Uuid, Path, description = "Reminder list ID")),
    responses((status = 200, description = "List row", content_type = "text/html", body = String))
)]
pub async fn get_list_row(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let list = owned_list(&state, &user, list_id).await?;
    let selected = is_selected(&state, &user, list_id).await?;
    Ok(Html(partials::list_row(&list, selected)))
}

/// Deletes a reminder list row
///
/// The empty body makes HTMX remove the row.
#[utoipa::path(
    delete,
    path = "/reminders/list-row/{list_id}",
    tag = "HTMX Partials",
    params(("list_id" = Uuid, Path, description = "Reminder list ID")),
    responses((status = 200, description = "Row removed", content_type = "text/html", body = String))
)]
pub async fn delete_list_row(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    if !state.repo.delete_list(&user.username, list_id).await? {
        return Err(AppError::NotFound("Reminder list not found".to_string()));
    }
    tracing::info!(username = %user.username, %list_id, "reminder list deleted");
    Ok(Html(String::new()))
}

/// Gets the edit form for a reminder list row
#[utoipa::path(
    get,
    path = "/reminders/list-row-edit/{list_id}",
    tag = "HTMX Partials",
    params(("list_id" = Uuid, Path, description = "Reminder list ID")),
    responses((status = 200, description = "List edit row", content_type = "text/html", body = String))
)]
pub async fn get_list_row_edit(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let list = owned_list(&state, &user, list_id).await?;
    Ok(Html(partials::list_row_edit(&list)))
}

/// Renames a reminder list from its edit row
#[utoipa::path(
    patch,
    path = "/reminders/list-row-name/{list_id}",
    tag = "HTMX Partials",
    params(("list_id" = Uuid, Path, description = "Reminder list ID")),
    request_body(content = ListNameForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 200, description = "Updated list row", content_type = "text/html", body = String))
)]
pub async fn patch_list_row_name(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    Form(form): Form<ListNameForm>,
) -> Result<Html<String>, AppError> {
    let name = clean_text(&form.name, "name")?;
    let list = state
        .repo
        .rename_list(&user.username, list_id, &name)
        .await?
        .ok_or_else(|| AppError::NotFound("Reminder list not found".to_string()))?;
    let selected = is_selected(&state, &user, list_id).await?;
    Ok(Html(partials::list_row(&list, selected)))
}

/// Creates a new reminder list row
#[utoipa::path(
    post,
    path = "/reminders/new-list-row",
    tag = "HTMX Partials",
    request_body(content = ListNameForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 200, description = "New list row", content_type = "text/html", body = String))
)]
pub async fn post_new_list_row(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Form(form): Form<ListNameForm>,
) -> Result<Html<String>, AppError> {
    let name = clean_text(&form.name, "name")?;
    let list = state.repo.create_list(&user.username, &name).await?;
    tracing::info!(username = %user.username, list_id = %list.id, "reminder list created");
    Ok(Html(partials::list_row(&list, false)))
}

/// Selects a reminder list and shows its items. The list rows are refreshed out of band.
#[utoipa::path(
    post,
    path = "/reminders/select/{list_id}",
    tag = "HTMX Partials",
    params(("list_id" = Uuid, Path, description = "Reminder list ID")),
    responses((status = 200, description = "Items panel plus out-of-band list rows", content_type = "text/html", body = String))
)]
pub async fn post_select_list(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let list = owned_list(&state, &user, list_id).await?;
    state.repo.set_selected_list(&user.username, Some(list.id)).await?;
    let items = state.repo.get_items(&user.username, list.id).await?;
    let lists = state.repo.get_lists(&user.username).await?;
    tracing::debug!(username = %user.username, list_id = %list.id, "reminder list selected");
    Ok(Html(format!(
        "{}\n{}",
        partials::items_panel(Some(&list), &items),
        partials::list_rows_oob(&lists, Some(list.id))
    )))
}

// --- Item Partials ---

/// Gets a reminder item row
#[utoipa::path(
    get,
    path = "/reminders/item-row/{item_id}",
    tag = "HTMX Partials",
    params(("item_id" = Uuid, Path, description = "Reminder item ID")),
    responses((status = 200, description = "Item row", content_type = "text/html", body = String))
)]
pub async fn get_item_row(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let item = owned_item(&state, &user, item_id).await?;
    Ok(Html(partials::item_row(&item)))
}

/// Deletes a reminder item row
#[utoipa::path(
    delete,
    path = "/reminders/item-row/{item_id}",
    tag = "HTMX Partials",
    params(("item_id" = Uuid, Path, description = "Reminder item ID")),
    responses((status = 200, description = "Row removed", content_type = "text/html", body = String))
)]
pub async fn delete_item_row(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    if !state.repo.delete_item(&user.username, item_id).await? {
        return Err(AppError::NotFound("Reminder item not found".to_string()));
    }
    Ok(Html(String::new()))
}

/// Gets the edit form for a reminder item row
#[utoipa::path(
    get,
    path = "/reminders/item-row-edit/{item_id}",
    tag = "HTMX Partials",
    params(("item_id" = Uuid, Path, description = "Reminder item ID")),
    responses((status = 200, description = "Item edit row", content_type = "text/html", body = String))
)]
pub async fn get_item_row_edit(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let item = owned_item(&state, &user, item_id).await?;
    Ok(Html(partials::item_row_edit(&item)))
}

/// Updates a reminder item's description from its edit row
#[utoipa::path(
    patch,
    path = "/reminders/item-row-description/{item_id}",
    tag = "HTMX Partials",
    params(("item_id" = Uuid, Path, description = "Reminder item ID")),
    request_body(content = ItemDescriptionForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 200, description = "Updated item row", content_type = "text/html", body = String))
)]
pub async fn patch_item_row_description(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Form(form): Form<ItemDescriptionForm>,
) -> Result<Html<String>, AppError> {
    let description = clean_text(&form.description, "description")?;
    let update = UpdateReminderItemRequest {
        description: Some(description),
        completed: None,
    };
    let item = state
        .repo
        .update_item(&user.username, item_id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("Reminder item not found".to_string()))?;
    Ok(Html(partials::item_row(&item)))
}

/// Toggles the strike-through (completion) of a reminder item
#[utoipa::path(
    patch,
    path = "/reminders/item-row-strike/{item_id}",
    tag = "HTMX Partials",
    params(("item_id" = Uuid, Path, description = "Reminder item ID")),
    responses((status = 200, description = "Updated item row", content_type = "text/html", body = String))
)]
pub async fn patch_item_row_strike(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<Html<String>, AppError> {
    let item = owned_item(&state, &user, item_id).await?;
    let update = UpdateReminderItemRequest {
        description: None,
        completed: Some(!item.completed),
    };
    let item = state
        .repo
        .update_item(&user.username, item_id, update)
        .await?
        .ok_or_else(|| AppError::NotFound("Reminder item not found".to_string()))?;
    Ok(Html(partials::item_row(&item)))
}

/// Adds a new item row to a reminder list
#[utoipa::path(
    post,
    path = "/reminders/new-item-row/{list_id}",
    tag = "HTMX Partials",
    params(("list_id" = Uuid, Path, description = "Reminder list ID")),
    request_body(content = ItemDescriptionForm, content_type = "application/x-www-form-urlencoded"),
    responses((status = 200, description = "New item row", content_type = "text/html", body = String))
)]
pub async fn post_new_item_row(
    Extension(user): Extension<AuthCookie>,
    State(state): State<AppState>,
    Path(list_id): Path<Uuid>,
    Form(form): Form<ItemDescriptionForm>,
) -> Result<Html<String>, AppError> {
    let description = clean_text(&form.description, "description")?;
    let item = state
        .repo
        .create_item(&user.username, list_id, &description)
        .await?
        .ok_or_else(|| AppError::NotFound("Reminder list not found".to_string()))?;
    Ok(Html(partials::item_row(&item)))
}
