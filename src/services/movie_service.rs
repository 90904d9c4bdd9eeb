//! Domain service for the movie catalog.

use thiserror::Error;

use crate::models::{Movie, MovieInput, User};

pub const MOVIE_ADDED: &str = "Movie added successfully!";
pub const MOVIE_UPDATED: &str = "Movie updated successfully!";
pub const MOVIE_DELETED: &str = "Movie deleted successfully!";

/// Upper bound for the "latest movies" listing.
pub const MAX_LATEST_LIMIT: u64 = 50;

/// Message reported after listing movies.
#[must_use]
pub const fn fetch_message(count: usize) -> &'static str {
    if count == 0 {
        "0 movies were fetched successfully!"
    } else {
        "Movies fetched successfully!"
    }
}

/// Errors specific to movie operations.
///
/// The display text is the message shown to users.
#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Movie with ID {0} not found!")]
    NotFound(i32),

    #[error("You don't have permission to {0} this movie!")]
    Forbidden(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Selected director does not exist!")]
    DirectorMissing,

    #[error("A movie with this title and director already exists!")]
    Duplicate,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for MovieError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for MovieError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Domain service trait for movies.
#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    /// Lists movies ordered by title, optionally filtered by a search term.
    async fn list(&self, query: Option<&str>) -> Result<Vec<Movie>, MovieError>;

    /// Gets a single movie with its director and creator.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::NotFound`] if no movie has this id.
    async fn get(&self, id: i32) -> Result<Movie, MovieError>;

    /// The most recently added movies, newest first. `limit` is clamped to `1..=50`.
    async fn latest(&self, limit: u64) -> Result<Vec<Movie>, MovieError>;

    /// Validates and stores a new movie owned by `actor`.
    async fn create(&self, actor: &User, input: &MovieInput) -> Result<Movie, MovieError>;

    /// Replaces the editable fields of a movie.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::Forbidden`] unless `actor` created the movie or is an admin.
    async fn update(&self, actor: &User, id: i32, input: &MovieInput)
    -> Result<Movie, MovieError>;

    /// Deletes a movie and returns the removed record.
    async fn delete(&self, actor: &User, id: i32) -> Result<Movie, MovieError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_message() {
        assert_eq!(fetch_message(0), "0 movies were fetched successfully!");
        assert_eq!(fetch_message(1), "Movies fetched successfully!");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(MovieError::NotFound(9).to_string(), "Movie with ID 9 not found!");
        assert_eq!(
            MovieError::Forbidden("delete").to_string(),
            "You don't have permission to delete this movie!"
        );
    }
}
