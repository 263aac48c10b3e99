use crate::{AppState, handlers::reminders};
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Reminders Router
///
/// The reminders page plus the HTMX partials it swaps in. Every route here sits
/// behind the page guard, which redirects anonymous callers to the login page.
pub fn reminders_routes() -> Router<AppState> {
    Router::new()
        // GET /reminders
        // Full page: all lists of the user and the items of the selected one.
        .route("/reminders", get(reminders::get_reminders_page))
        // --- List rows ---
        // GET/DELETE /reminders/list-row/{list_id}
        // DELETE answers with an empty body so HTMX drops the row.
        .route(
            "/reminders/list-row/{list_id}",
            get(reminders::get_list_row).delete(reminders::delete_list_row),
        )
        .route(
            "/reminders/list-row-edit/{list_id}",
            get(reminders::get_list_row_edit),
        )
        .route(
            "/reminders/list-row-name/{list_id}",
            patch(reminders::patch_list_row_name),
        )
        .route("/reminders/new-list-row", post(reminders::post_new_list_row))
        // POST /reminders/select/{list_id}
        // Remembers the selection and returns the items panel.
        .route("/reminders/select/{list_id}", post(reminders::post_select_list))
        // --- Item rows ---
        .route(
            "/reminders/item-row/{item_id}",
            get(reminders::get_item_row).delete(reminders::delete_item_row),
        )
        .route(
            "/reminders/item-row-edit/{item_id}",
            get(reminders::get_item_row_edit),
        )
        .route(
            "/reminders/item-row-description/{item_id}",
            patch(reminders::patch_item_row_description),
        )
        // PATCH /reminders/item-row-strike/{item_id}
        // Toggles completion.
        .route(
            "/reminders/item-row-strike/{item_id}",
            patch(reminders::patch_item_row_strike),
        )
        .route(
            "/reminders/new-item-row/{list_id}",
            post(reminders::post_new_item_row),
        )
}
