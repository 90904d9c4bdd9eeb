use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::SecurityConfig;
use crate::models::{Director, DirectorDraft, Movie, MovieDraft, Role, User};

pub mod migrator;
pub mod repositories;
pub mod seed;

/// Whether a repository error was caused by a UNIQUE index.
#[must_use]
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DbErr>().and_then(DbErr::sql_err),
        Some(SqlErr::UniqueConstraintViolation(_))
    )
}

/// Whether a repository error was caused by a restricting foreign key.
#[must_use]
pub fn is_foreign_key_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<DbErr>().and_then(DbErr::sql_err),
        Some(SqlErr::ForeignKeyConstraintViolation(_))
    )
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:");
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    /// The sqlx pool behind the sea-orm connection, shared with the session store.
    #[must_use]
    pub fn sqlite_pool(&self) -> &sea_orm::sqlx::SqlitePool {
        self.conn.get_sqlite_connection_pool()
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn director_repo(&self) -> repositories::director::DirectorRepository {
        repositories::director::DirectorRepository::new(self.conn.clone())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
        security: &SecurityConfig,
    ) -> Result<User> {
        self.user_repo()
            .create(name, email, password, role, security)
            .await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.user_repo().get_by_email(email).await
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.user_repo().list().await
    }

    pub async fn verify_user_password(&self, email: &str, password: &str) -> Result<bool> {
        self.user_repo().verify_password(email, password).await
    }

    pub async fn update_user_password(
        &self,
        user_id: i32,
        new_password: &str,
        security: &SecurityConfig,
    ) -> Result<()> {
        self.user_repo()
            .update_password(user_id, new_password, security)
            .await
    }

    pub async fn set_user_role(&self, email: &str, role: Role) -> Result<bool> {
        self.user_repo().set_role(email, role).await
    }

    pub async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>> {
        self.user_repo().verify_api_key(api_key).await
    }

    pub async fn get_user_api_key(&self, user_id: i32) -> Result<Option<String>> {
        self.user_repo().get_api_key(user_id).await
    }

    pub async fn regenerate_user_api_key(&self, user_id: i32) -> Result<String> {
        self.user_repo().regenerate_api_key(user_id).await
    }

    // ========================================================================
    // Directors
    // ========================================================================

    pub async fn list_directors(&self) -> Result<Vec<Director>> {
        self.director_repo().list().await
    }

    pub async fn get_director(&self, id: i32) -> Result<Option<Director>> {
        self.director_repo().get(id).await
    }

    pub async fn director_exists(&self, id: i32) -> Result<bool> {
        self.director_repo().exists(id).await
    }

    pub async fn find_duplicate_director(
        &self,
        name: &str,
        birth_year: Option<i32>,
        exclude_id: Option<i32>,
    ) -> Result<Option<i32>> {
        self.director_repo()
            .find_duplicate(name, birth_year, exclude_id)
            .await
    }

    pub async fn add_director(&self, draft: &DirectorDraft, added_by: i32) -> Result<i32> {
        self.director_repo().insert(draft, added_by).await
    }

    pub async fn update_director(&self, id: i32, draft: &DirectorDraft) -> Result<()> {
        self.director_repo().update(id, draft).await
    }

    pub async fn remove_director(&self, id: i32) -> Result<bool> {
        self.director_repo().delete(id).await
    }

    pub async fn count_movies_for_director(&self, id: i32) -> Result<u64> {
        self.director_repo().count_movies(id).await
    }

    // ========================================================================
    // Movies
    // ========================================================================

    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.movie_repo().list().await
    }

    pub async fn latest_movies(&self, limit: u64) -> Result<Vec<Movie>> {
        self.movie_repo().latest(limit).await
    }

    pub async fn get_movie(&self, id: i32) -> Result<Option<Movie>> {
        self.movie_repo().get(id).await
    }

    pub async fn find_duplicate_movie(
        &self,
        title: &str,
        director_id: i32,
        exclude_id: Option<i32>,
    ) -> Result<Option<i32>> {
        self.movie_repo()
            .find_duplicate(title, director_id, exclude_id)
            .await
    }

    pub async fn add_movie(&self, draft: &MovieDraft, user_id: i32) -> Result<i32> {
        self.movie_repo().insert(draft, user_id).await
    }

    pub async fn update_movie(&self, id: i32, draft: &MovieDraft) -> Result<()> {
        self.movie_repo().update(id, draft).await
    }

    pub async fn remove_movie(&self, id: i32) -> Result<bool> {
        self.movie_repo().delete(id).await
    }
}
