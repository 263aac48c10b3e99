//! Full pages.

use super::{layout, partials};
use crate::models::{ReminderItem, ReminderList};

/// Banner shown above the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginMessage {
    Invalid,
    LoggedOut,
    Unauthorized,
}

impl LoginMessage {
    fn text(self) -> &'static str {
        match self {
            LoginMessage::Invalid => "Invalid username or password.",
            LoginMessage::LoggedOut => "You have been logged out.",
            LoginMessage::Unauthorized => "Please log in to continue.",
        }
    }

    fn class(self) -> &'static str {
        match self {
            LoginMessage::LoggedOut => "message info",
            _ => "message error",
        }
    }
}

pub fn login_page(message: Option<LoginMessage>) -> String {
    let banner = message
        .map(|m| format!(r#"<p class="{}">{}</p>"#, m.class(), m.text()))
        .unwrap_or_default();

    let body = format!(
        r#"<section class="login panel">
    <h1>Welcome to Bulldoggy</h1>
    <p>The reminders app.</p>
    {banner}
    <form method="post" action="/login">
        <label for="username">Username</label>
        <input id="username" type="text" name="username" autocomplete="username" required>
        <label for="password">Password</label>
        <input id="password" type="password" name="password" autocomplete="current-password" required>
        <button type="submit">Login</button>
    </form>
</section>"#
    );
    layout("Login", None, &body)
}

/// The main reminders page: lists on the left, the selected list's items on the right.
pub fn reminders_page(
    username: &str,
    lists: &[ReminderList],
    selected: Option<&ReminderList>,
    items: &[ReminderItem],
) -> String {
    let rows = partials::list_rows(lists, selected.map(|list| list.id));

    let body = format!(
        r#"<div class="reminders">
    <section class="panel lists-panel">
        <h2>Reminder lists</h2>
        <div id="reminder-lists">
{rows}
        </div>
        {new_list}
    </section>
    {items}
</div>"#,
        new_list = partials::new_list_form(),
        items = partials::items_panel(selected, items),
    );
    layout("Reminders", Some(username), &body)
}

/// The friendly page browsers are redirected to for unknown paths.
pub fn not_found_page(username: Option<&str>) -> String {
    let body = r#"<section class="not-found panel">
    <h1>Page not found</h1>
    <p>Woof! Bulldoggy sniffed everywhere but could not find that page.</p>
    <p><a class="button" href="/">Back to the app</a></p>
</section>"#;
    layout("Not Found", username, body)
}
