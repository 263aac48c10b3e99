//! HTML templates for the Bulldoggy pages and HTMX partials.
//!
//! Each template is a function from its context to a `String`. Every value that
//! originates from a user is passed through [`html_escape`] before it is
//! interpolated.

pub mod pages;
pub mod partials;

/// Escape HTML special characters to prevent XSS attacks.
pub fn html_escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Shared page chrome: head, header bar with the logged-in user, and body.
pub fn layout(title: &str, username: Option<&str>, body: &str) -> String {
    let title = html_escape(title);
    let nav = match username {
        Some(name) => format!(
            r#"<span class="user">Logged in as <strong>{}</strong></span>
            <a class="button" href="/logout">Logout</a>"#,
            html_escape(name)
        ),
        None => String::new(),
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} | Bulldoggy</title>
    <link rel="icon" href="/favicon.ico">
    <link rel="stylesheet" href="/static/css/bulldoggy.css">
    <script src="https://unpkg.com/htmx.org@1.9.12"></script>
</head>
<body>
    <header class="top-bar">
        <a class="brand" href="/">
            <img src="/static/img/logos/bulldoggy-500px.png" alt="Bulldoggy logo" height="48">
            <span>Bulldoggy</span>
        </a>
        <nav>{nav}</nav>
    </header>
    <main>
{body}
    </main>
</body>
</html>
"##
    )
}
