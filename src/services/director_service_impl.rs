//! `SeaORM` implementation of the `DirectorService` trait.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::db::{Store, is_foreign_key_violation, is_unique_violation};
use crate::models::{Director, DirectorInput, User, current_year};
use crate::services::director_service::{DirectorError, DirectorService};
use crate::services::filter::filter_directors;
use crate::services::permissions::can_modify;

pub struct SeaOrmDirectorService {
    store: Store,
}

impl SeaOrmDirectorService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    fn map_write_error(err: anyhow::Error) -> DirectorError {
        if is_unique_violation(&err) {
            DirectorError::Duplicate
        } else {
            DirectorError::from(err)
        }
    }
}

#[async_trait]
impl DirectorService for SeaOrmDirectorService {
    async fn list(&self, query: Option<&str>) -> Result<Vec<Director>, DirectorError> {
        let directors = self.store.list_directors().await?;
        Ok(filter_directors(directors, query))
    }

    async fn get(&self, id: i32) -> Result<Director, DirectorError> {
        self.store
            .get_director(id)
            .await?
            .ok_or(DirectorError::NotFound(id))
    }

    async fn create(
        &self,
        actor: &User,
        input: &DirectorInput,
    ) -> Result<Director, DirectorError> {
        let draft = input
            .validate(current_year())
            .map_err(DirectorError::Validation)?;

        if self
            .store
            .find_duplicate_director(&draft.name, draft.birth_year, None)
            .await?
            .is_some()
        {
            return Err(DirectorError::Duplicate);
        }

        let id = self
            .store
            .add_director(&draft, actor.id)
            .await
            .map_err(Self::map_write_error)?;

        self.get(id).await
    }

    async fn update(
        &self,
        actor: &User,
        id: i32,
        input: &DirectorInput,
    ) -> Result<Director, DirectorError> {
        let existing = self.get(id).await?;

        if !can_modify(actor, existing.added_by) {
            warn!(user_id = actor.id, director_id = id, "Director update denied");
            return Err(DirectorError::Forbidden("update"));
        }

        let draft = input
            .validate(current_year())
            .map_err(DirectorError::Validation)?;

        if self
            .store
            .find_duplicate_director(&draft.name, draft.birth_year, Some(id))
            .await?
            .is_some()
        {
            return Err(DirectorError::Duplicate);
        }

        self.store
            .update_director(id, &draft)
            .await
            .map_err(Self::map_write_error)?;

        info!(user_id = actor.id, director_id = id, "Director updated");
        self.get(id).await
    }

    async fn delete(&self, actor: &User, id: i32) -> Result<Director, DirectorError> {
        let existing = self.get(id).await?;

        if !can_modify(actor, existing.added_by) {
            warn!(user_id = actor.id, director_id = id, "Director delete denied");
            return Err(DirectorError::Forbidden("delete"));
        }

        if self.store.count_movies_for_director(id).await? > 0 {
            return Err(DirectorError::HasMovies);
        }

        let removed = self.store.remove_director(id).await.map_err(|e| {
            if is_foreign_key_violation(&e) {
                DirectorError::HasMovies
            } else {
                DirectorError::from(e)
            }
        })?;

        if !removed {
            return Err(DirectorError::NotFound(id));
        }

        info!(user_id = actor.id, director_id = id, "Director deleted");
        Ok(existing)
    }
}
