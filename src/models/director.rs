use serde::{Deserialize, Serialize};

use super::{MAX_NAME_CHARS, parse_optional_year, text_or_number};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Director {
    pub id: i32,
    pub name: String,
    pub birth_year: Option<i32>,
    pub added_by: i32,
    pub added_by_name: String,
    pub created_at: String,
}

/// Raw director fields as submitted by a form or JSON body.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DirectorInput {
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "birthYear", deserialize_with = "text_or_number")]
    pub birth_year: Option<String>,
}

/// A validated director, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectorDraft {
    pub name: String,
    pub birth_year: Option<i32>,
}

impl DirectorInput {
    /// Birth years may not lie in the future.
    pub fn validate(&self, current_year: i32) -> Result<DirectorDraft, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required!".to_string());
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err("Name must be 255 characters or less!".to_string());
        }

        let birth_year =
            parse_optional_year(self.birth_year.as_deref(), "Birth year", current_year)?;

        Ok(DirectorDraft {
            name: name.to_string(),
            birth_year,
        })
    }
}

impl From<&Director> for DirectorInput {
    fn from(director: &Director) -> Self {
        Self {
            name: director.name.clone(),
            birth_year: director.birth_year.map(|y| y.to_string()),
        }
    }
}
