pub mod director;
pub mod movie;
pub mod user;

pub use director::{Director, DirectorDraft, DirectorInput};
pub use movie::{DirectorSummary, Movie, MovieDraft, MovieInput, UserSummary};
pub use user::{Role, User};

use serde::{Deserialize, Deserializer};

/// Earliest year accepted for birth and release years.
pub const MIN_YEAR: i32 = 1800;

/// Longest accepted director name or movie title, in characters.
pub const MAX_NAME_CHARS: usize = 255;

/// Current UTC timestamp in the storage format.
///
/// Fixed microsecond precision keeps lexical and chronological order equal.
#[must_use]
pub fn timestamp_now() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

#[must_use]
pub fn current_year() -> i32 {
    use chrono::Datelike;
    chrono::Utc::now().year()
}

/// Parses an optional year field.
///
/// Blank input means "no year". Anything else must be an integer inside `min..=max`.
pub(crate) fn parse_optional_year(
    raw: Option<&str>,
    label: &str,
    max: i32,
) -> Result<Option<i32>, String> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };

    let year: i32 = raw
        .parse()
        .map_err(|_| format!("{label} must be a valid number!"))?;

    if !(MIN_YEAR..=max).contains(&year) {
        return Err(format!("{label} must be between {MIN_YEAR} and {max}!"));
    }

    Ok(Some(year))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

/// Accepts `"1999"`, `1999` or `null` for fields that are validated as text later.
pub(crate) fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<TextOrNumber>::deserialize(deserializer)?;
    Ok(value.map(|v| match v {
        TextOrNumber::Text(s) => s,
        TextOrNumber::Integer(n) => n.to_string(),
        TextOrNumber::Float(f) => f.to_string(),
    }))
}
