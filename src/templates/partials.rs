//! HTMX partials: fragments swapped into the reminders page.

use super::html_escape;
use crate::models::{ReminderItem, ReminderList};
use uuid::Uuid;

/// DOM id of the list row for `list`.
pub fn list_row_id(list: &ReminderList) -> String {
    format!("list-row-{}", list.id)
}

/// DOM id of the item row for `item`.
pub fn item_row_id(item: &ReminderItem) -> String {
    format!("item-row-{}", item.id)
}

/// A reminder list in the left panel. Clicking the name selects it.
pub fn list_row(list: &ReminderList, selected: bool) -> String {
    let id = list.id;
    let row_id = list_row_id(list);
    let class = if selected { "list-row selected" } else { "list-row" };
    let name = html_escape(&list.name);

    format!(
        r##"<div id="{row_id}" class="{class}">
    <span class="list-name" hx-post="/reminders/select/{id}" hx-target="#reminder-items" hx-swap="outerHTML">{name}</span>
    <button class="edit" hx-get="/reminders/list-row-edit/{id}" hx-target="#{row_id}" hx-swap="outerHTML">Edit</button>
    <button class="delete" hx-delete="/reminders/list-row/{id}" hx-target="#{row_id}" hx-swap="outerHTML" hx-confirm="Delete this list and all of its reminders?">Delete</button>
</div>"##
    )
}

/// Every list row, with only `selected_id` carrying the selected class.
pub fn list_rows(lists: &[ReminderList], selected_id: Option<Uuid>) -> String {
    lists
        .iter()
        .map(|list| list_row(list, Some(list.id) == selected_id))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Out-of-band swap that replaces the rows of `#reminder-lists`.
pub fn list_rows_oob(lists: &[ReminderList], selected_id: Option<Uuid>) -> String {
    format!(
        "<div id=\"reminder-lists\" hx-swap-oob=\"innerHTML\">\n{}\n</div>",
        list_rows(lists, selected_id)
    )
}

/// Inline rename form for a list row.
pub fn list_row_edit(list: &ReminderList) -> String {
    let id = list.id;
    let row_id = list_row_id(list);
    let name = html_escape(&list.name);

    format!(
        r##"<form id="{row_id}" class="list-row editing" hx-patch="/reminders/list-row-name/{id}" hx-target="this" hx-swap="outerHTML">
    <input type="text" name="name" value="{name}" required autofocus>
    <button type="submit">Save</button>
    <button type="button" hx-get="/reminders/list-row/{id}" hx-target="#{row_id}" hx-swap="outerHTML">Cancel</button>
</form>"##
    )
}

/// Form that appends a new list row to the lists panel.
pub fn new_list_form() -> String {
    r##"<form class="new-list" hx-post="/reminders/new-list-row" hx-target="#reminder-lists" hx-swap="beforeend" hx-on::after-request="this.reset()">
    <input type="text" name="name" placeholder="New list name" required>
    <button type="submit">Add list</button>
</form>"##
        .to_string()
}

/// A single reminder. Completed reminders are struck through.
pub fn item_row(item: &ReminderItem) -> String {
    let id = item.id;
    let row_id = item_row_id(item);
    let class = if item.completed { "item-row completed" } else { "item-row" };
    let description = if item.completed {
        format!("<s>{}</s>", html_escape(&item.description))
    } else {
        html_escape(&item.description)
    };
    let checked = if item.completed { " checked" } else { "" };

    format!(
        r##"<div id="{row_id}" class="{class}">
    <input type="checkbox"{checked} hx-patch="/reminders/item-row-strike/{id}" hx-target="#{row_id}" hx-swap="outerHTML">
    <span class="item-description">{description}</span>
    <button class="edit" hx-get="/reminders/item-row-edit/{id}" hx-target="#{row_id}" hx-swap="outerHTML">Edit</button>
    <button class="delete" hx-delete="/reminders/item-row/{id}" hx-target="#{row_id}" hx-swap="outerHTML">Delete</button>
</div>"##
    )
}

/// Inline edit form for an item row.
pub fn item_row_edit(item: &ReminderItem) -> String {
    let id = item.id;
    let row_id = item_row_id(item);
    let description = html_escape(&item.description);

    format!(
        r##"<form id="{row_id}" class="item-row editing" hx-patch="/reminders/item-row-description/{id}" hx-target="this" hx-swap="outerHTML">
    <input type="text" name="description" value="{description}" required autofocus>
    <button type="submit">Save</button>
    <button type="button" hx-get="/reminders/item-row/{id}" hx-target="#{row_id}" hx-swap="outerHTML">Cancel</button>
</form>"##
    )
}

/// The right-hand panel: items of the selected list, or a hint when none is selected.
pub fn items_panel(list: Option<&ReminderList>, items: &[ReminderItem]) -> String {
    let Some(list) = list else {
        return r#"<section id="reminder-items" class="panel">
    <p class="hint">Select a list to see its reminders.</p>
</section>"#
            .to_string();
    };

    let id = list.id;
    let name = html_escape(&list.name);
    let rows: String = items.iter().map(item_row).collect::<Vec<_>>().join("\n");

    format!(
        r##"<section id="reminder-items" class="panel">
    <h2>{name}</h2>
    <div id="reminder-item-rows">
{rows}
    </div>
    <form class="new-item" hx-post="/reminders/new-item-row/{id}" hx-target="#reminder-item-rows" hx-swap="beforeend" hx-on::after-request="this.reset()">
        <input type="text" name="description" placeholder="New reminder" required>
        <button type="submit">Add reminder</button>
    </form>
</section>"##
    )
}
