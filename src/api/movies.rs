//! Movie catalog endpoints. Business rules live in [`MovieService`].
//!
//! [`MovieService`]: crate::services::MovieService

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::validation::{normalize_search_query, validate_id, validate_limit};
use super::{
    ApiError, ApiResponse, AppState, DeletedMovieDto, LatestQuery, MovieListDto, SearchQuery,
};
use crate::models::{Movie, MovieInput};
use crate::services::MovieError;
use crate::services::movie_service::{MOVIE_ADDED, MOVIE_DELETED, MOVIE_UPDATED, fetch_message};

impl From<MovieError> for ApiError {
    fn from(err: MovieError) -> Self {
        match err {
            MovieError::NotFound(_) => Self::NotFound(err.to_string()),
            MovieError::Forbidden(_) => Self::Forbidden(err.to_string()),
            MovieError::Validation(msg) => Self::validation(msg),
            MovieError::DirectorMissing => Self::validation(err.to_string()),
            MovieError::Duplicate => Self::Conflict(err.to_string()),
            MovieError::Database(msg) => Self::DatabaseError(msg),
            MovieError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `GET /api/movies?q=`
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<ApiResponse<MovieListDto>>, ApiError> {
    let q = normalize_search_query(query.q.as_deref());
    let movies = state.movie_service().list(q).await?;

    Ok(Json(ApiResponse::with_message(
        fetch_message(movies.len()),
        MovieListDto {
            count: movies.len(),
            movies,
        },
    )))
}

/// `GET /api/movies/latest?limit=`
pub async fn latest_movies(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<LatestQuery>,
) -> Result<Json<ApiResponse<Vec<Movie>>>, ApiError> {
    let limit = validate_limit(
        query
            .limit
            .unwrap_or(state.config().catalog.latest_movies_limit),
    )?;

    let movies = state.movie_service().latest(limit).await?;
    Ok(Json(ApiResponse::with_message(
        fetch_message(movies.len()),
        movies,
    )))
}

/// `GET /api/movies/{id}`
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<Movie>>, ApiError> {
    let id = validate_id("movie", id)?;
    let movie = state.movie_service().get(id).await?;
    Ok(Json(ApiResponse::success(movie)))
}

/// `POST /api/movies`
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(input): ApiJson<MovieInput>,
) -> Result<impl IntoResponse, ApiError> {
    let movie = state.movie_service().create(&user, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(MOVIE_ADDED, movie)),
    ))
}

/// `PUT /api/movies/{id}`
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<MovieInput>,
) -> Result<Json<ApiResponse<Movie>>, ApiError> {
    let id = validate_id("movie", id)?;
    let movie = state.movie_service().update(&user, id, &input).await?;
    Ok(Json(ApiResponse::with_message(MOVIE_UPDATED, movie)))
}

/// `DELETE /api/movies/{id}`
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<DeletedMovieDto>>, ApiError> {
    let id = validate_id("movie", id)?;
    let removed = state.movie_service().delete(&user, id).await?;

    Ok(Json(ApiResponse::with_message(
        MOVIE_DELETED,
        DeletedMovieDto {
            id: removed.id,
            title: removed.title,
        },
    )))
}
