/// Router Module Index
///
/// One router per area of the app. Guards are not applied here: the composer in
/// `lib.rs` wraps the API and Reminders routers with their guard layers, so every
/// route in those modules can assume an `AuthCookie` request extension.

/// Top-level pages (`/`, `/not-found`) and the favicon. Unguarded.
pub mod pages;

/// Login form, login submission and logout. Unguarded.
pub mod login;

/// JSON API under `/api/`. Guarded with a 401 on a missing session.
pub mod api;

/// Reminders page and its HTMX partials. Guarded with a login redirect.
pub mod reminders;
