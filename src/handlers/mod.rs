//! Request handlers, grouped the same way as the routers in [`crate::routes`].
//!
//! Every handler is annotated with `#[utoipa::path]` (except the favicon and the
//! fallback) so it shows up in the generated OpenAPI document under its tag.

pub mod api;
pub mod login;
pub mod pages;
pub mod reminders;
