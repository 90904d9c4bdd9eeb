//! Domain service for the director catalog.

use thiserror::Error;

use crate::models::{Director, DirectorInput, User};

pub const DIRECTOR_ADDED: &str = "Director added successfully!";
pub const DIRECTOR_UPDATED: &str = "Director updated successfully!";
pub const DIRECTOR_DELETED: &str = "Director deleted successfully!";

/// Errors specific to director operations.
///
/// The display text is the message shown to users.
#[derive(Debug, Error)]
pub enum DirectorError {
    #[error("Director with ID {0} not found!")]
    NotFound(i32),

    #[error("You don't have permission to {0} this director!")]
    Forbidden(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("A director with this name and birth year already exists!")]
    Duplicate,

    #[error("Cannot delete a director that still has movies!")]
    HasMovies,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for DirectorError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for DirectorError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for directors.
#[async_trait::async_trait]
pub trait DirectorService: Send + Sync {
    /// Lists directors ordered by name, optionally filtered by a search term.
    async fn list(&self, query: Option<&str>) -> Result<Vec<Director>, DirectorError>;

    /// Gets a single director.
    ///
    /// # Errors
    ///
    /// Returns [`DirectorError::NotFound`] if no director has this id.
    async fn get(&self, id: i32) -> Result<Director, DirectorError>;

    /// Validates and stores a new director owned by `actor`.
    async fn create(&self, actor: &User, input: &DirectorInput)
    -> Result<Director, DirectorError>;

    /// Replaces the name and birth year of a director.
    ///
    /// # Errors
    ///
    /// Returns [`DirectorError::Forbidden`] unless `actor` created the director or is an admin.
    async fn update(
        &self,
        actor: &User,
        id: i32,
        input: &DirectorInput,
    ) -> Result<Director, DirectorError>;

    /// Deletes a director and returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`DirectorError::HasMovies`] while movies still reference it.
    async fn delete(&self, actor: &User, id: i32) -> Result<Director, DirectorError>;
}
