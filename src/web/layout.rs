use axum::response::Html;
use std::fmt::Write;

use super::flash::Flash;
use super::html::{attr, text};
use crate::models::User;

/// Wraps page content with the document head, navigation and pending flash message.
#[must_use]
pub fn page(title: &str, user: Option<&User>, flash: Option<&Flash>, body: &str) -> Html<String> {
    let mut out = String::with_capacity(body.len() + 1024);

    let _ = write!(
        out,
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{} · Cinedex</title>
<link rel="stylesheet" href="/assets/app.css">
</head>
<body>
"#,
        text(title)
    );

    out.push_str(&nav(user));
    out.push_str("<main class=\"container\">\n");

    if let Some(flash) = flash {
        let _ = writeln!(
            out,
            r#"<div class="{}" role="status">{}</div>"#,
            flash.kind.css_class(),
            text(&flash.message)
        );
    }

    out.push_str(body);
    out.push_str("\n</main>\n</body>\n</html>\n");

    Html(out)
}

fn nav(user: Option<&User>) -> String {
    let session_links = user.map_or_else(
        || {
            r#"<a href="/login">Login</a>
<a href="/register">Register</a>"#
                .to_string()
        },
        |user| {
            format!(
                r#"<a href="/account" class="nav-user" title="{}">{}</a>
<form method="post" action="/logout" class="inline"><button type="submit" class="link">Logout</button></form>"#,
                attr(&user.email),
                text(&user.name)
            )
        },
    );

    format!(
        r#"<header class="nav">
<a href="/" class="brand">Cinedex</a>
<nav>
<a href="/movies">Movies</a>
<a href="/directors">Directors</a>
{session_links}
</nav>
</header>
"#
    )
}

/// "Back to ..." link shown above cards.
#[must_use]
pub fn back_link(href: &str, page_name: &str) -> String {
    format!(
        r#"<p><a class="back" href="{}">&larr; Back to {}</a></p>"#,
        attr(href),
        text(&page_name.to_lowercase())
    )
}
