//! Small helpers for hand-written HTML.

use std::borrow::Cow;

/// Escapes text placed between tags.
#[must_use]
pub fn text(value: &str) -> Cow<'_, str> {
    html_escape::encode_text(value)
}

/// Escapes a value placed inside a double quoted attribute.
#[must_use]
pub fn attr(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}

/// Cuts `value` to at most `max_chars` characters, adding an ellipsis when shortened.
#[must_use]
pub fn truncate(value: &str, max_chars: usize) -> Cow<'_, str> {
    match value.char_indices().nth(max_chars) {
        None => Cow::Borrowed(value),
        Some((byte_idx, _)) => Cow::Owned(format!("{}…", value[..byte_idx].trim_end())),
    }
}

/// `YYYY-MM-DD` part of a stored timestamp.
#[must_use]
pub fn display_date(timestamp: &str) -> &str {
    timestamp.get(..10).unwrap_or(timestamp)
}

#[must_use]
pub fn year_or_na(year: Option<i32>) -> String {
    year.map_or_else(|| "N/A".to_string(), |y| y.to_string())
}

/// `<input type="hidden">` carrying a value across wizard steps.
#[must_use]
pub fn hidden(name: &str, value: &str) -> String {
    format!(
        r#"<input type="hidden" name="{}" value="{}">"#,
        attr(name),
        attr(value)
    )
}
