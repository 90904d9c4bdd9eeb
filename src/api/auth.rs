use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::extract::ApiJson;
use super::{ApiError, ApiResponse, AppState, UserDto};
use crate::models::User;
use crate::services::{AuthError, RegisterInput};

/// Session key holding the logged in user's id.
pub const SESSION_USER_KEY: &str = "user_id";

/// The authenticated user, inserted into request extensions by the auth middlewares.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => Self::Unauthorized(err.to_string()),
            AuthError::UserExists => Self::Conflict(err.to_string()),
            AuthError::UserNotFound => Self::NotFound(err.to_string()),
            AuthError::RegistrationDisabled => Self::Forbidden(err.to_string()),
            AuthError::Validation(msg) => Self::validation(msg),
            AuthError::Database(msg) => Self::DatabaseError(msg),
            AuthError::Internal(msg) => Self::internal(msg),
        }
    }
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub user: UserDto,
    pub api_key: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Serialize)]
pub struct ApiKeyResponse {
    pub api_key: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Resolves the caller from, in order:
/// 1. Session cookie (from login)
/// 2. `X-Api-Key` header
/// 3. `Authorization: Bearer <api_key>` header
///
/// The user row is reloaded on every request so role changes apply immediately.
pub async fn resolve_user(
    state: &AppState,
    session: &Session,
    headers: &HeaderMap,
) -> Result<Option<User>, ApiError> {
    let session_user = session
        .get::<i32>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?;

    if let Some(user_id) = session_user {
        if let Some(user) = state.auth_service().find_user(user_id).await? {
            return Ok(Some(user));
        }
        // The account is gone; drop the stale session.
        let _ = session.flush().await;
    }

    if let Some(key) = extract_api_key(headers) {
        return Ok(state.auth_service().verify_api_key(&key).await?);
    }

    Ok(None)
}

/// Authentication middleware for the JSON API. Unauthenticated calls get a 401 envelope.
pub async fn auth_middleware(
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
        Ok(None) => ApiError::login_required().into_response(),
        Err(e) => e.into_response(),
    }
}

/// Extract API key from headers
fn extract_api_key(headers: &HeaderMap) -> Option<String> {
    if let Some(api_key) = headers.get("X-Api-Key")
        && let Ok(key_str) = api_key.to_str()
    {
        return Some(key_str.trim().to_string());
    }

    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

/// Binds `user` to the session under a fresh session id.
pub async fn start_session(session: &Session, user: &User) -> Result<(), ApiError> {
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to rotate session: {e}")))?;

    session
        .insert(SESSION_USER_KEY, user.id)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
/// Create an account and log it in
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    ApiJson(payload): ApiJson<RegisterInput>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.auth_service().register(payload).await?;
    start_session(&session, &user).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Account created successfully!",
            UserDto::from(user),
        )),
    ))
}

/// POST /auth/login
/// Authenticate with email and password, returns API key on success
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    if payload.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state
        .auth_service()
        .login(&payload.email, &payload.password)
        .await?;

    start_session(&session, &user).await?;
    tracing::info!(user_id = user.id, "User logged in");

    let api_key = user.api_key.clone();
    Ok(Json(ApiResponse::with_message(
        "Logged in successfully!",
        LoginResponse {
            user: UserDto::from(user),
            api_key,
        },
    )))
}

/// POST /auth/logout
/// Invalidate the current session
pub async fn logout(session: Session) -> Json<ApiResponse<()>> {
    let _ = session.flush().await;
    Json(ApiResponse::message("Logged out successfully!"))
}

/// GET /auth/me
pub async fn get_current_user(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Json<ApiResponse<UserDto>> {
    Json(ApiResponse::success(UserDto::from(user)))
}

/// PUT /auth/password
/// Change password (requires current password verification)
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .auth_service()
        .change_password(user.id, &payload.current_password, &payload.new_password)
        .await?;

    tracing::info!(user_id = user.id, "Password changed");

    Ok(Json(ApiResponse::message("Password updated successfully")))
}

/// GET /auth/api-key
pub async fn get_api_key(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ApiKeyResponse>>, ApiError> {
    let api_key = state.auth_service().get_api_key(user.id).await?;
    Ok(Json(ApiResponse::success(ApiKeyResponse { api_key })))
}

/// POST /auth/api-key/regenerate
/// Generate a new random API key
pub async fn regenerate_api_key(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<ApiResponse<ApiKeyResponse>>, ApiError> {
    let api_key = state.auth_service().regenerate_api_key(user.id).await?;
    Ok(Json(ApiResponse::success(ApiKeyResponse { api_key })))
}
