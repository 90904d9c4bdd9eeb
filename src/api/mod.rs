use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post, put},
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, SessionManagerLayer, cookie::SameSite};

use crate::config::Config;
use crate::state::SharedState;

mod assets;
pub mod auth;
mod directors;
mod error;
mod extract;
mod movies;
mod observability;
pub mod session;
mod system;
mod types;
pub mod validation;

pub use error::{ApiError, LOGIN_REQUIRED};
pub use session::AppSessionStore;
pub use types::*;

use crate::services::{AuthService, DirectorService, MovieService};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub session_store: AppSessionStore,

    pub start_time: Instant,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        self.shared.config()
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn AuthService> {
        &self.shared.auth_service
    }

    #[must_use]
    pub fn director_service(&self) -> &Arc<dyn DirectorService> {
        &self.shared.director_service
    }

    #[must_use]
    pub fn movie_service(&self) -> &Arc<dyn MovieService> {
        &self.shared.movie_service
    }
}

pub async fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let session_store =
        AppSessionStore::build(shared.config().server.session_backend, &shared.store).await?;

    Ok(Arc::new(AppState {
        shared,
        session_store,
        start_time: Instant::now(),
        prometheus_handle,
    }))
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    create_app_state(shared, prometheus_handle).await
}

/// The whole HTTP surface: JSON API under `/api`, HTML pages, and embedded assets.
pub fn router(state: Arc<AppState>) -> Router {
    let server = &state.config().server;

    let session_layer = SessionManagerLayer::new(state.session_store.clone())
        .with_name("cinedex.sid")
        .with_secure(server.secure_cookies)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(
            server.session_expiry_days,
        )));

    let cors_origins = &server.cors_allowed_origins;
    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    let api_router = Router::new()
        .merge(create_protected_router(state.clone()))
        .route("/health", get(system::health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .with_state(state.clone());

    Router::new()
        .nest("/api", api_router)
        .merge(crate::web::router(state.clone()))
        .route("/assets/{*path}", get(assets::serve_asset))
        .fallback(crate::web::not_found)
        .layer(session_layer)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::security_headers_middleware))
        .layer(middleware::from_fn(observability::logging_middleware))
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/me", get(auth::get_current_user))
        .route("/auth/password", put(auth::change_password))
        .route("/auth/api-key", get(auth::get_api_key))
        .route("/auth/api-key/regenerate", post(auth::regenerate_api_key))
        .route(
            "/directors",
            get(directors::list_directors).post(directors::create_director),
        )
        .route(
            "/directors/{id}",
            get(directors::get_director)
                .put(directors::update_director)
                .delete(directors::delete_director),
        )
        .route(
            "/movies",
            get(movies::list_movies).post(movies::create_movie),
        )
        .route("/movies/latest", get(movies::latest_movies))
        .route(
            "/movies/{id}",
            get(movies::get_movie)
                .put(movies::update_movie)
                .delete(movies::delete_movie),
        )
        .route("/metrics", get(observability::get_metrics))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}
