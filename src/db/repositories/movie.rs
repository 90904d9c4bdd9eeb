use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use std::collections::HashMap;
use tracing::info;

use super::director::UNKNOWN_USER;
use crate::entities::{directors, movies, prelude::*, users};
use crate::models::{DirectorSummary, Movie, MovieDraft, UserSummary, timestamp_now};

/// Repository for movie operations
pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    // ========================================================================
    // Model Conversion Helpers
    // ========================================================================

    fn map_model(
        model: movies::Model,
        director: Option<directors::Model>,
        creator_name: Option<&str>,
    ) -> Movie {
        let director = director.map_or_else(
            || DirectorSummary {
                id: model.director_id,
                name: "Unknown director".to_string(),
                birth_year: None,
            },
            |d| DirectorSummary {
                id: d.id,
                name: d.name,
                birth_year: d.birth_year,
            },
        );

        Movie {
            id: model.id,
            title: model.title,
            release_year: model.release_year,
            description: model.description,
            director_id: model.director_id,
            user_id: model.user_id,
            created_at: model.created_at,
            director,
            added_by_user: UserSummary {
                id: model.user_id,
                name: creator_name.unwrap_or(UNKNOWN_USER).to_string(),
            },
        }
    }

    /// Resolve creator names for a batch of rows with one query.
    async fn assemble(
        &self,
        rows: Vec<(movies::Model, Option<directors::Model>)>,
    ) -> Result<Vec<Movie>> {
        let mut user_ids: Vec<i32> = rows.iter().map(|(m, _)| m.user_id).collect();
        user_ids.sort_unstable();
        user_ids.dedup();

        let names: HashMap<i32, String> = if user_ids.is_empty() {
            HashMap::new()
        } else {
            Users::find()
                .filter(users::Column::Id.is_in(user_ids))
                .all(&self.conn)
                .await
                .context("Failed to load movie creators")?
                .into_iter()
                .map(|u| (u.id, u.name))
                .collect()
        };

        Ok(rows
            .into_iter()
            .map(|(movie, director)| {
                let creator = names.get(&movie.user_id).map(String::as_str);
                Self::map_model(movie, director, creator)
            })
            .collect())
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// All movies ordered by title.
    pub async fn list(&self) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .find_also_related(Directors)
            .order_by_asc(movies::Column::Title)
            .order_by_asc(movies::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list movies")?;

        self.assemble(rows).await
    }

    /// Most recently added movies, newest first.
    pub async fn latest(&self, limit: u64) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .find_also_related(Directors)
            .order_by_desc(movies::Column::CreatedAt)
            .order_by_desc(movies::Column::Id)
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list latest movies")?;

        self.assemble(rows).await
    }

    pub async fn get(&self, id: i32) -> Result<Option<Movie>> {
        let row = Movies::find_by_id(id)
            .find_also_related(Directors)
            .one(&self.conn)
            .await
            .context("Failed to query movie")?;

        let Some(row) = row else {
            return Ok(None);
        };

        Ok(self.assemble(vec![row]).await?.into_iter().next())
    }

    /// Id of another movie with the same title by the same director, if any.
    pub async fn find_duplicate(
        &self,
        title: &str,
        director_id: i32,
        exclude_id: Option<i32>,
    ) -> Result<Option<i32>> {
        let mut query = Movies::find()
            .filter(movies::Column::Title.eq(title))
            .filter(movies::Column::DirectorId.eq(director_id));

        if let Some(id) = exclude_id {
            query = query.filter(movies::Column::Id.ne(id));
        }

        let existing = query.one(&self.conn).await?;
        Ok(existing.map(|m| m.id))
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    pub async fn insert(&self, draft: &MovieDraft, user_id: i32) -> Result<i32> {
        let active = movies::ActiveModel {
            title: Set(draft.title.clone()),
            release_year: Set(draft.release_year),
            description: Set(draft.description.clone()),
            director_id: Set(draft.director_id),
            user_id: Set(user_id),
            created_at: Set(timestamp_now()),
            ..Default::default()
        };

        let res = Movies::insert(active).exec(&self.conn).await?;
        info!("Added movie {}: {}", res.last_insert_id, draft.title);
        Ok(res.last_insert_id)
    }

    pub async fn update(&self, id: i32, draft: &MovieDraft) -> Result<()> {
        let active = movies::ActiveModel {
            id: Set(id),
            title: Set(draft.title.clone()),
            release_year: Set(draft.release_year),
            description: Set(draft.description.clone()),
            director_id: Set(draft.director_id),
            ..Default::default()
        };

        active.update(&self.conn).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Movies::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }
}
