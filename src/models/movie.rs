use serde::{Deserialize, Serialize};

use super::{MAX_NAME_CHARS, parse_optional_year, text_or_number};

/// How far into the future a release year may be announced.
pub const RELEASE_YEAR_LOOKAHEAD: i32 = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorSummary {
    pub id: i32,
    pub name: String,
    pub birth_year: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub release_year: Option<i32>,
    pub description: Option<String>,
    pub director_id: i32,
    pub user_id: i32,
    pub created_at: String,
    pub director: DirectorSummary,
    pub added_by_user: UserSummary,
}

/// Raw movie fields as submitted by a form or JSON body.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MovieInput {
    #[serde(default)]
    pub title: String,
    #[serde(default, alias = "releaseYear", deserialize_with = "text_or_number")]
    pub release_year: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "directorId", deserialize_with = "text_or_number")]
    pub director_id: Option<String>,
}

/// A validated movie, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieDraft {
    pub title: String,
    pub release_year: Option<i32>,
    pub description: Option<String>,
    pub director_id: i32,
}

impl MovieInput {
    pub fn validate(&self, current_year: i32) -> Result<MovieDraft, String> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title is required!".to_string());
        }
        if title.chars().count() > MAX_NAME_CHARS {
            return Err("Title must be 255 characters or less!".to_string());
        }

        let release_year = parse_optional_year(
            self.release_year.as_deref(),
            "Release year",
            current_year + RELEASE_YEAR_LOOKAHEAD,
        )?;

        let description = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let director_id = self
            .director_id
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| "Director is required!".to_string())?
            .parse::<i32>()
            .map_err(|_| "Invalid director ID!".to_string())?;

        Ok(MovieDraft {
            title: title.to_string(),
            release_year,
            description,
            director_id,
        })
    }
}

impl From<&Movie> for MovieInput {
    fn from(movie: &Movie) -> Self {
        Self {
            title: movie.title.clone(),
            release_year: movie.release_year.map(|y| y.to_string()),
            description: movie.description.clone(),
            director_id: Some(movie.director_id.to_string()),
        }
    }
}
