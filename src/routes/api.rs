use crate::{AppState, handlers::api};
use axum::{Router, routing::get};

/// API Router
///
/// JSON endpoints for reminder lists and items. All data is scoped to the
/// `AuthCookie` inserted by the API guard; a list or item owned by another user
/// is indistinguishable from a missing one.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // --- Reminder Lists ---
        // GET/POST /api/reminders
        .route(
            "/api/reminders",
            get(api::get_reminder_lists).post(api::create_reminder_list),
        )
        // GET/PATCH/DELETE /api/reminders/{list_id}
        .route(
            "/api/reminders/{list_id}",
            get(api::get_reminder_list)
                .patch(api::update_reminder_list)
                .delete(api::delete_reminder_list),
        )
        // --- Reminder Items ---
        // GET/POST /api/reminders/{list_id}/items
        .route(
            "/api/reminders/{list_id}/items",
            get(api::get_reminder_items).post(api::create_reminder_item),
        )
        // GET/PATCH/DELETE /api/items/{item_id}
        .route(
            "/api/items/{item_id}",
            get(api::get_reminder_item)
                .patch(api::update_reminder_item)
                .delete(api::delete_reminder_item),
        )
}
