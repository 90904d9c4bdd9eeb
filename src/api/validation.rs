use super::ApiError;
use crate::services::movie_service::MAX_LATEST_LIMIT;

pub fn validate_id(resource: &str, id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid {resource} ID: {id}. ID must be a positive integer"
        )));
    }
    Ok(id)
}

pub fn validate_limit(limit: u64) -> Result<u64, ApiError> {
    const MIN_LIMIT: u64 = 1;

    if !(MIN_LIMIT..=MAX_LATEST_LIMIT).contains(&limit) {
        return Err(ApiError::validation(format!(
            "Invalid limit: {limit}. Limit must be between {MIN_LIMIT} and {MAX_LATEST_LIMIT}"
        )));
    }
    Ok(limit)
}

/// Search terms are optional; blank ones count as absent.
pub fn normalize_search_query(query: Option<&str>) -> Option<&str> {
    query.map(str::trim).filter(|q| !q.is_empty())
}
