//! `SeaORM` implementation of the `MovieService` trait.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::db::{Store, is_foreign_key_violation, is_unique_violation};
use crate::models::{Movie, MovieDraft, MovieInput, User, current_year};
use crate::services::filter::filter_movies;
use crate::services::movie_service::{MAX_LATEST_LIMIT, MovieError, MovieService};
use crate::services::permissions::can_modify;

pub struct SeaOrmMovieService {
    store: Store,
}

impl SeaOrmMovieService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn map_write_error(err: anyhow::Error) -> MovieError {
        if is_unique_violation(&err) {
            MovieError::Duplicate
        } else if is_foreign_key_violation(&err) {
            MovieError::DirectorMissing
        } else {
            MovieError::from(err)
        }
    }

    /// Validation shared by create and update. `exclude_id` skips the movie being edited.
    async fn checked_draft(
        &self,
        input: &MovieInput,
        exclude_id: Option<i32>,
    ) -> Result<MovieDraft, MovieError> {
        let draft = input
            .validate(current_year())
            .map_err(MovieError::Validation)?;

        if !self.store.director_exists(draft.director_id).await? {
            return Err(MovieError::DirectorMissing);
        }

        if self
            .store
            .find_duplicate_movie(&draft.title, draft.director_id, exclude_id)
            .await?
            .is_some()
        {
            return Err(MovieError::Duplicate);
        }

        Ok(draft)
    }
}

#[async_trait]
impl MovieService for SeaOrmMovieService {
    async fn list(&self, query: Option<&str>) -> Result<Vec<Movie>, MovieError> {
        let movies = self.store.list_movies().await?;
        Ok(filter_movies(movies, query))
    }

    async fn get(&self, id: i32) -> Result<Movie, MovieError> {
        self.store
            .get_movie(id)
            .await?
            .ok_or(MovieError::NotFound(id))
    }

    async fn latest(&self, limit: u64) -> Result<Vec<Movie>, MovieError> {
        let limit = limit.clamp(1, MAX_LATEST_LIMIT);
        Ok(self.store.latest_movies(limit).await?)
    }

    async fn create(&self, actor: &User, input: &MovieInput) -> Result<Movie, MovieError> {
        let draft = self.checked_draft(input, None).await?;

        let id = self
            .store
            .add_movie(&draft, actor.id)
            .await
            .map_err(Self::map_write_error)?;

        self.get(id).await
    }

    async fn update(
        &self,
        actor: &User,
        id: i32,
        input: &MovieInput,
    ) -> Result<Movie, MovieError> {
        let existing = self.get(id).await?;

        if !can_modify(actor, existing.user_id) {
            warn!(user_id = actor.id, movie_id = id, "Movie update denied");
            return Err(MovieError::Forbidden("update"));
        }

        let draft = self.checked_draft(input, Some(id)).await?;

        self.store
            .update_movie(id, &draft)
            .await
            .map_err(Self::map_write_error)?;

        info!(user_id = actor.id, movie_id = id, "Movie updated");
        self.get(id).await
    }

    async fn delete(&self, actor: &User, id: i32) -> Result<Movie, MovieError> {
        let existing = self.get(id).await?;

        if !can_modify(actor, existing.user_id) {
            warn!(user_id = actor.id, movie_id = id, "Movie delete denied");
            return Err(MovieError::Forbidden("delete"));
        }

        if !self.store.remove_movie(id).await? {
            return Err(MovieError::NotFound(id));
        }

        info!(user_id = actor.id, movie_id = id, "Movie deleted");
        Ok(existing)
    }
}
