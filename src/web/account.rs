use axum::{Extension, Form, extract::State, response::{Html, Response}};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::flash::Flash;
use super::html::{attr, display_date, text};
use super::{PageError, redirect_with, render};
use crate::api::AppState;
use crate::api::auth::CurrentUser;
use crate::services::AuthError;

const ACCOUNT: &str = "/account";

#[derive(Debug, Default, Deserialize)]
pub struct PasswordForm {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

/// `GET /account`
pub async fn show(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Html<String> {
    let min = state.config().security.min_password_length;
    let body = format!(
        r#"<section class="card narrow">
<h1>Your account</h1>
<dl class="details">
<dt>Name</dt><dd>{name}</dd>
<dt>Email</dt><dd>{email}</dd>
<dt>Role</dt><dd><span class="badge">{role}</span></dd>
<dt>Member since</dt><dd>{since}</dd>
</dl>
</section>
<section class="card narrow">
<h2>API key</h2>
<p class="muted">Send it as <code>X-Api-Key</code> or <code>Authorization: Bearer</code> to use the JSON API.</p>
<input type="text" readonly value="{key}" class="mono">
<form method="post" action="/account/api-key" class="actions">
<button type="submit" class="button outline">Regenerate key</button>
</form>
</section>
<section class="card narrow">
<h2>Change password</h2>
<form method="post" action="/account/password">
<label>Current password <input type="password" name="current_password" required autocomplete="current-password"></label>
<label>New password <input type="password" name="new_password" required minlength="{min}" autocomplete="new-password"></label>
<div class="actions"><button type="submit" class="button primary">Update password</button></div>
</form>
</section>"#,
        name = text(&user.name),
        email = text(&user.email),
        role = user.role.as_str(),
        since = text(display_date(&user.created_at)),
        key = attr(&user.api_key),
    );

    render(&session, "Account", Some(&user), &body).await
}

/// `POST /account/password`
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<PasswordForm>,
) -> Result<Response, PageError> {
    match state
        .auth_service()
        .change_password(user.id, &form.current_password, &form.new_password)
        .await
    {
        Ok(()) => {
            tracing::info!(user_id = user.id, "Password changed");
            Ok(redirect_with(&session, Flash::success("Password updated successfully!"), ACCOUNT).await)
        }
        Err(e @ (AuthError::Validation(_) | AuthError::InvalidCredentials)) => {
            Ok(redirect_with(&session, Flash::error(e.to_string()), ACCOUNT).await)
        }
        Err(e) => Err(e.into()),
    }
}

/// `POST /account/api-key`
pub async fn regenerate_api_key(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Response, PageError> {
    state.auth_service().regenerate_api_key(user.id).await?;
    tracing::info!(user_id = user.id, "API key regenerated");
    Ok(redirect_with(&session, Flash::success("API key regenerated successfully!"), ACCOUNT).await)
}
