use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

// --- Core Application Schemas (Mapped to Database) ---

/// ReminderList
///
/// A named list of reminders from the `reminder_lists` table. Owned by exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default, PartialEq)]
pub struct ReminderList {
    pub id: Uuid,
    // Username of the owner (resolved from the session cookie).
    pub owner: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// ReminderItem
///
/// A single reminder inside a list, from the `reminder_items` table.
/// `owner` is duplicated from the parent list so ownership checks need no join.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, FromRow, Default, PartialEq)]
pub struct ReminderItem {
    pub id: Uuid,
    // FK to reminder_lists.id, cascades on delete.
    pub list_id: Uuid,
    pub owner: String,
    pub description: String,
    // Struck-through in the UI when true.
    pub completed: bool,
    pub created_at: DateTime<Utc>,
}

// --- Request Payloads (Input Schemas) ---

/// Payload for creating or renaming a reminder list.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct ReminderListRequest {
    #[schema(example = "Chores")]
    pub name: String,
}

/// Payload for creating a reminder item.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct NewReminderItemRequest {
    #[schema(example = "Take out the trash")]
    pub description: String,
}

/// UpdateReminderItemRequest
///
/// Partial update for an item (PATCH /api/items/{item_id}). Omitted fields are left unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateReminderItemRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

/// Form posted by the login page.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Form field for list names in HTMX partials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ListNameForm {
    pub name: String,
}

/// Form field for item descriptions in HTMX partials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ItemDescriptionForm {
    pub description: String,
}

/// Trims user text and rejects it when nothing is left.
pub fn clean_text(raw: &str, field: &str) -> Result<String, AppError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}
