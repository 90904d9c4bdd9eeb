use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::flash::Flash;
use super::html::{attr, text};
use super::{PageError, redirect_with, render, safe_return_to};
use crate::api::AppState;
use crate::api::auth::{resolve_user, start_session};
use crate::services::{AuthError, RegisterInput};

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    #[serde(default, rename = "returnTo")]
    pub return_to: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "returnTo")]
    pub return_to: Option<String>,
}

fn error_block(error: Option<&str>) -> String {
    error.map_or_else(String::new, |e| {
        format!(r#"<div class="form-error" role="alert">{}</div>"#, text(e))
    })
}

fn login_body(email: &str, return_to: &str, error: Option<&str>) -> String {
    format!(
        r#"<section class="card narrow">
<h1>Login</h1>
{error}
<form method="post" action="/login">
<input type="hidden" name="returnTo" value="{return_to}">
<label>Email <input type="email" name="email" value="{email}" required autocomplete="email"></label>
<label>Password <input type="password" name="password" required autocomplete="current-password"></label>
<div class="actions"><button type="submit" class="button primary">Login</button></div>
</form>
<p class="muted">No account yet? <a href="/register">Register</a></p>
</section>"#,
        error = error_block(error),
        return_to = attr(return_to),
        email = attr(email),
    )
}

fn register_body(name: &str, email: &str, error: Option<&str>) -> String {
    format!(
        r#"<section class="card narrow">
<h1>Register</h1>
{error}
<form method="post" action="/register">
<label>Name <input type="text" name="name" value="{name}" required minlength="2" autocomplete="name"></label>
<label>Email <input type="email" name="email" value="{email}" required autocomplete="email"></label>
<label>Password <input type="password" name="password" required minlength="8" autocomplete="new-password"></label>
<div class="actions"><button type="submit" class="button primary">Create account</button></div>
</form>
<p class="muted">Already registered? <a href="/login">Login</a></p>
</section>"#,
        error = error_block(error),
        name = attr(name),
        email = attr(email),
    )
}

/// `GET /login`
pub async fn login_form(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
    Query(query): Query<LoginQuery>,
) -> Result<Response, PageError> {
    let return_to = safe_return_to(query.return_to.as_deref());

    if resolve_user(&state, &session, &headers).await?.is_some() {
        return Ok(Redirect::to(&return_to).into_response());
    }

    let body = login_body("", &return_to, None);
    Ok(render(&session, "Login", None, &body).await.into_response())
}

/// `POST /login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response, PageError> {
    let return_to = safe_return_to(form.return_to.as_deref());

    if form.email.trim().is_empty() || form.password.is_empty() {
        let body = login_body(&form.email, &return_to, Some("Email and password are required"));
        return Ok((
            StatusCode::BAD_REQUEST,
            render(&session, "Login", None, &body).await,
        )
            .into_response());
    }

    match state
        .auth_service()
        .login(&form.email, &form.password)
        .await
    {
        Ok(user) => {
            start_session(&session, &user).await?;
            tracing::info!(user_id = user.id, "User logged in");
            Ok(redirect_with(
                &session,
                Flash::success(format!("Welcome back, {}!", user.name)),
                &return_to,
            )
            .await)
        }
        Err(AuthError::InvalidCredentials) => {
            let message = AuthError::InvalidCredentials.to_string();
            let body = login_body(&form.email, &return_to, Some(&message));
            Ok((
                StatusCode::UNAUTHORIZED,
                render(&session, "Login", None, &body).await,
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// `GET /register`
pub async fn register_form(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    if resolve_user(&state, &session, &headers).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    let body = register_body("", "", None);
    Ok(render(&session, "Register", None, &body).await.into_response())
}

/// `POST /register`
pub async fn register(
    State(state): State<Arc<AppState>>,
    session: Session,
    Form(form): Form<RegisterInput>,
) -> Result<Response, PageError> {
    let (name, email) = (form.name.clone(), form.email.clone());

    match state.auth_service().register(form).await {
        Ok(user) => {
            start_session(&session, &user).await?;
            Ok(redirect_with(&session, Flash::success("Account created successfully!"), "/").await)
        }
        Err(
            e @ (AuthError::Validation(_)
            | AuthError::UserExists
            | AuthError::RegistrationDisabled),
        ) => {
            let body = register_body(&name, &email, Some(&e.to_string()));
            Ok((
                StatusCode::BAD_REQUEST,
                render(&session, "Register", None, &body).await,
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// `POST /logout`
pub async fn logout(session: Session) -> Redirect {
    let _ = session.flush().await;
    Redirect::to("/login")
}
