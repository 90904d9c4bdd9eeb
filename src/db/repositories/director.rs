use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

use crate::entities::{directors, movies, prelude::*, users};
use crate::models::{Director, DirectorDraft, timestamp_now};

/// Shown when a record's creator can no longer be resolved.
pub const UNKNOWN_USER: &str = "Unknown user";

/// Repository for director operations
pub struct DirectorRepository {
    conn: DatabaseConnection,
}

impl DirectorRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(model: directors::Model, creator: Option<users::Model>) -> Director {
        Director {
            id: model.id,
            name: model.name,
            birth_year: model.birth_year,
            added_by: model.added_by,
            added_by_name: creator.map_or_else(|| UNKNOWN_USER.to_string(), |u| u.name),
            created_at: model.created_at,
        }
    }

    /// All directors ordered by name, with the name of the user who added them.
    pub async fn list(&self) -> Result<Vec<Director>> {
        let rows = Directors::find()
            .find_also_related(Users)
            .order_by_asc(directors::Column::Name)
            .order_by_asc(directors::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list directors")?;

        Ok(rows
            .into_iter()
            .map(|(director, creator)| Self::map_model(director, creator))
            .collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Director>> {
        let row = Directors::find_by_id(id)
            .find_also_related(Users)
            .one(&self.conn)
            .await
            .context("Failed to query director")?;

        Ok(row.map(|(director, creator)| Self::map_model(director, creator)))
    }

    pub async fn exists(&self, id: i32) -> Result<bool> {
        let count = Directors::find()
            .filter(directors::Column::Id.eq(id))
            .count(&self.conn)
            .await?;
        Ok(count > 0)
    }

    /// Id of another director with the same name and birth year, if any.
    /// A missing birth year only matches other missing birth years.
    pub async fn find_duplicate(
        &self,
        name: &str,
        birth_year: Option<i32>,
        exclude_id: Option<i32>,
    ) -> Result<Option<i32>> {
        let mut query = Directors::find().filter(directors::Column::Name.eq(name));

        query = match birth_year {
            Some(year) => query.filter(directors::Column::BirthYear.eq(year)),
            None => query.filter(directors::Column::BirthYear.is_null()),
        };

        if let Some(id) = exclude_id {
            query = query.filter(directors::Column::Id.ne(id));
        }

        let existing = query.one(&self.conn).await?;
        Ok(existing.map(|d| d.id))
    }

    pub async fn insert(&self, draft: &DirectorDraft, added_by: i32) -> Result<i32> {
        let active = directors::ActiveModel {
            name: Set(draft.name.clone()),
            birth_year: Set(draft.birth_year),
            added_by: Set(added_by),
            created_at: Set(timestamp_now()),
            ..Default::default()
        };

        let res = Directors::insert(active).exec(&self.conn).await?;
        info!("Added director {}: {}", res.last_insert_id, draft.name);
        Ok(res.last_insert_id)
    }

    pub async fn update(&self, id: i32, draft: &DirectorDraft) -> Result<()> {
        let active = directors::ActiveModel {
            id: Set(id),
            name: Set(draft.name.clone()),
            birth_year: Set(draft.birth_year),
            ..Default::default()
        };

        active.update(&self.conn).await?;
        Ok(())
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Directors::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count_movies(&self, id: i32) -> Result<u64> {
        let count = Movies::find()
            .filter(movies::Column::DirectorId.eq(id))
            .count(&self.conn)
            .await?;
        Ok(count)
    }
}
