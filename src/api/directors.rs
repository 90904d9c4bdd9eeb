//! Director catalog endpoints. Business rules live in [`DirectorService`].
//!
//! [`DirectorService`]: crate::services::DirectorService

use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::auth::CurrentUser;
use super::extract::{ApiJson, ApiPath, ApiQuery};
use super::validation::{normalize_search_query, validate_id};
use super::{ApiError, ApiResponse, AppState, DeletedDirectorDto, DirectorListDto, SearchQuery};
use crate::models::{Director, DirectorInput};
use crate::services::DirectorError;
use crate::services::director_service::{DIRECTOR_ADDED, DIRECTOR_DELETED, DIRECTOR_UPDATED};

impl From<DirectorError> for ApiError {
    fn from(err: DirectorError) -> Self {
        match err {
            DirectorError::NotFound(_) => Self::NotFound(err.to_string()),
            DirectorError::Forbidden(_) => Self::Forbidden(err.to_string()),
            DirectorError::Validation(msg) => Self::validation(msg),
            DirectorError::Duplicate | DirectorError::HasMovies => Self::Conflict(err.to_string()),
            DirectorError::Database(msg) => Self::DatabaseError(msg),
            DirectorError::Internal(msg) => Self::internal(msg),
        }
    }
}

/// `GET /api/directors?q=`
pub async fn list_directors(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<ApiResponse<DirectorListDto>>, ApiError> {
    let q = normalize_search_query(query.q.as_deref());
    let directors = state.director_service().list(q).await?;

    Ok(Json(ApiResponse::with_message(
        "Directors fetched successfully!",
        DirectorListDto {
            count: directors.len(),
            directors,
        },
    )))
}

/// `GET /api/directors/{id}`
pub async fn get_director(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<Director>>, ApiError> {
    let id = validate_id("director", id)?;
    let director = state.director_service().get(id).await?;
    Ok(Json(ApiResponse::success(director)))
}

/// `POST /api/directors`
pub async fn create_director(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(input): ApiJson<DirectorInput>,
) -> Result<impl IntoResponse, ApiError> {
    let director = state.director_service().create(&user, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(DIRECTOR_ADDED, director)),
    ))
}

/// `PUT /api/directors/{id}`
pub async fn update_director(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(input): ApiJson<DirectorInput>,
) -> Result<Json<ApiResponse<Director>>, ApiError> {
    let id = validate_id("director", id)?;
    let director = state.director_service().update(&user, id, &input).await?;
    Ok(Json(ApiResponse::with_message(DIRECTOR_UPDATED, director)))
}

/// `DELETE /api/directors/{id}`
///
/// Answers 409 while movies still reference the director.
pub async fn delete_director(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<DeletedDirectorDto>>, ApiError> {
    let id = validate_id("director", id)?;
    let removed = state.director_service().delete(&user, id).await?;

    Ok(Json(ApiResponse::with_message(
        DIRECTOR_DELETED,
        DeletedDirectorDto {
            id: removed.id,
            name: removed.name,
        },
    )))
}
