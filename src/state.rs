use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, DirectorService, MovieService, SeaOrmAuthService, SeaOrmDirectorService,
    SeaOrmMovieService,
};

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub auth_service: Arc<dyn AuthService>,

    pub director_service: Arc<dyn DirectorService>,

    pub movie_service: Arc<dyn MovieService>,
}

impl SharedState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Ok(Self::with_store(config, store))
    }

    /// Wires the services around an already connected store.
    #[must_use]
    pub fn with_store(config: Config, store: Store) -> Self {
        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            config.security.clone(),
            config.server.allow_registration,
        )) as Arc<dyn AuthService>;

        let director_service =
            Arc::new(SeaOrmDirectorService::new(store.clone())) as Arc<dyn DirectorService>;

        let movie_service =
            Arc::new(SeaOrmMovieService::new(store.clone())) as Arc<dyn MovieService>;

        Self {
            config: Arc::new(config),
            store,
            auth_service,
            director_service,
            movie_service,
        }
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
