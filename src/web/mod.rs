//! Server-rendered HTML pages.

use axum::{
    Json, Router,
    extract::{Request, State},
    http::{StatusCode, Uri},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tower_sessions::Session;

use crate::api::auth::{CurrentUser, resolve_user};
use crate::api::{ApiError, ApiResponse, AppState};
use crate::models::User;
use crate::services::{AuthError, DirectorError, MovieError};

mod account;
mod auth;
mod directors;
pub mod flash;
mod home;
pub mod html;
pub mod layout;
mod movies;
pub mod wizard;

use flash::Flash;

const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";

pub fn router(state: Arc<AppState>) -> Router {
    let protected = Router::new()
        .route("/directors", get(directors::list))
        .route(
            "/directors/new",
            get(directors::new_form).post(directors::submit_new),
        )
        .route(
            "/directors/{id}/edit",
            get(directors::edit_form).post(directors::submit_edit),
        )
        .route(
            "/directors/{id}/delete",
            get(directors::confirm_delete).post(directors::delete),
        )
        .route("/movies", get(movies::index))
        .route("/movies/new", get(movies::new_form).post(movies::submit_new))
        .route(
            "/movies/{id}/edit",
            get(movies::edit_form).post(movies::submit_edit),
        )
        .route(
            "/movies/{id}/delete",
            get(movies::confirm_delete).post(movies::delete),
        )
        .route("/account", get(account::show))
        .route("/account/password", post(account::change_password))
        .route("/account/api-key", post(account::regenerate_api_key))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login));

    Router::new()
        .merge(protected)
        .route("/", get(home::index))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/logout", post(auth::logout))
        .with_state(state)
}

/// Page guard: anonymous visitors are sent to the login page and brought back afterwards.
pub async fn require_login(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let resolved = resolve_user(&state, &session, request.headers()).await;

    match resolved {
        Ok(Some(user)) => {
            tracing::Span::current().record("user_id", user.id);
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        Ok(None) => {
            let target = request
                .uri()
                .path_and_query()
                .map_or("/", |pq| pq.as_str());
            Redirect::to(&login_redirect(target)).into_response()
        }
        Err(e) => PageError::from(e).into_response(),
    }
}

#[must_use]
pub fn login_redirect(target: &str) -> String {
    format!("/login?returnTo={}", urlencoding::encode(target))
}

/// Only local, relative destinations are followed after login.
#[must_use]
pub fn safe_return_to(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(path) if path.chars().any(|c| c.is_control() || c.is_whitespace()) => {
            "/".to_string()
        }
        Some(path)
            if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') =>
        {
            path.to_string()
        }
        _ => "/".to_string(),
    }
}

/// Renders `body` inside the layout, consuming the pending flash message.
pub async fn render(session: &Session, title: &str, user: Option<&User>, body: &str) -> Html<String> {
    let flash = flash::take(session).await;
    layout::page(title, user, flash.as_ref(), body)
}

/// Stores `flash` and redirects to `to` with 303 See Other.
pub async fn redirect_with(session: &Session, flash: Flash, to: &str) -> Response {
    flash::push(session, flash).await;
    Redirect::to(to).into_response()
}

/// Fallback for unknown routes: JSON under `/api`, an HTML page elsewhere.
pub async fn not_found(uri: Uri) -> Response {
    let path = uri.path();
    if path == "/api" || path.starts_with("/api/") {
        return (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<()>::error("Resource not found")),
        )
            .into_response();
    }

    PageError::new(StatusCode::NOT_FOUND, "Page not found").into_response()
}

/// Failure of a page handler, rendered as a standalone error page.
#[derive(Debug)]
pub struct PageError {
    status: StatusCode,
    message: String,
}

impl PageError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn internal(detail: &str) -> Self {
        tracing::error!("Page handler failed: {detail}");
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, GENERIC_FAILURE)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        let body = format!(
            r#"<section class="card">
<h1>{}</h1>
<p>{}</p>
<p><a class="button outline" href="/">Back to home page</a></p>
</section>"#,
            self.status.as_u16(),
            html::text(&self.message)
        );
        (self.status, layout::page("Error", None, None, &body)).into_response()
    }
}

impl From<ApiError> for PageError {
    fn from(err: ApiError) -> Self {
        Self::internal(&err.to_string())
    }
}

impl From<AuthError> for PageError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Database(ref msg) | AuthError::Internal(ref msg) => Self::internal(msg),
            AuthError::UserNotFound => Self::new(StatusCode::NOT_FOUND, err.to_string()),
            _ => Self::new(StatusCode::BAD_REQUEST, err.to_string()),
        }
    }
}

impl From<DirectorError> for PageError {
    fn from(err: DirectorError) -> Self {
        let status = match err {
            DirectorError::Database(ref msg) | DirectorError::Internal(ref msg) => {
                return Self::internal(msg);
            }
            DirectorError::NotFound(_) => StatusCode::NOT_FOUND,
            DirectorError::Forbidden(_) => StatusCode::FORBIDDEN,
            DirectorError::Validation(_) => StatusCode::BAD_REQUEST,
            DirectorError::Duplicate | DirectorError::HasMovies => StatusCode::CONFLICT,
        };
        Self::new(status, err.to_string())
    }
}

impl From<MovieError> for PageError {
    fn from(err: MovieError) -> Self {
        let status = match err {
            MovieError::Database(ref msg) | MovieError::Internal(ref msg) => {
                return Self::internal(msg);
            }
            MovieError::NotFound(_) => StatusCode::NOT_FOUND,
            MovieError::Forbidden(_) => StatusCode::FORBIDDEN,
            MovieError::Validation(_) | MovieError::DirectorMissing => StatusCode::BAD_REQUEST,
            MovieError::Duplicate => StatusCode::CONFLICT,
        };
        Self::new(status, err.to_string())
    }
}
