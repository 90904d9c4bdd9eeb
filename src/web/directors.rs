use axum::{
    Extension, Form,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::fmt::Write;
use std::sync::Arc;
use tower_sessions::Session;

use super::flash::Flash;
use super::html::{attr, display_date, text, year_or_na};
use super::layout::back_link;
use super::wizard::{Mode, Outcome, Step, WizardView, advance};
use super::{PageError, redirect_with, render};
use crate::api::auth::CurrentUser;
use crate::api::{AppState, SearchQuery};
use crate::api::validation::normalize_search_query;
use crate::models::{Director, DirectorInput, MIN_YEAR, User, current_year};
use crate::services::can_modify;
use crate::services::director_service::{
    DIRECTOR_ADDED, DIRECTOR_DELETED, DIRECTOR_UPDATED, DirectorError,
};

const LIST: &str = "/directors";

#[derive(Debug, Deserialize)]
pub struct DirectorForm {
    #[serde(default)]
    pub step: Option<String>,
    #[serde(flatten)]
    pub input: DirectorInput,
}

fn fields(input: &DirectorInput) -> String {
    format!(
        r#"<label>Name <input type="text" name="name" value="{name}" maxlength="255" required></label>
<label>Birth year <input type="number" name="birth_year" value="{year}" min="{MIN_YEAR}" max="{max}" placeholder="Optional"></label>"#,
        name = attr(&input.name),
        year = attr(input.birth_year.as_deref().unwrap_or_default()),
        max = current_year(),
    )
}

/// Runs one wizard step for a director form. `commit` is awaited only on confirm.
async fn wizard_step<F, Fut>(
    session: &Session,
    user: &User,
    view: &WizardView<'_>,
    form: DirectorForm,
    commit: F,
) -> Result<Response, PageError>
where
    F: FnOnce(DirectorInput) -> Fut,
    Fut: Future<Output = Result<(String, &'static str), DirectorError>>,
{
    let step = Step::parse(form.step.as_deref());
    let title = view.heading();

    let html = match advance(step, form.input.validate(current_year())) {
        Outcome::Edit(error) => view.render_edit(&fields(&form.input), error.as_deref()),
        Outcome::Review(draft) => view.render_review(
            &[
                ("Name", draft.name.clone()),
                ("Birth year", year_or_na(draft.birth_year)),
            ],
            &[
                ("name", form.input.name.clone()),
                (
                    "birth_year",
                    form.input.birth_year.clone().unwrap_or_default(),
                ),
            ],
        ),
        Outcome::Commit(_) => {
            let input = form.input.clone();
            match commit(form.input).await {
                Ok((to, message)) => {
                    return Ok(redirect_with(session, Flash::success(message), &to).await);
                }
                Err(e @ (DirectorError::Database(_) | DirectorError::Internal(_))) => {
                    return Err(e.into());
                }
                Err(e) => view.render_edit(&fields(&input), Some(&e.to_string())),
            }
        }
    };

    Ok(render(session, &title, Some(user), &html).await.into_response())
}

fn table_row(director: &Director, viewer: &User) -> String {
    let you = if director.added_by == viewer.id { " (You)" } else { "" };
    let actions = if can_modify(viewer, director.added_by) {
        format!(
            r#"<a href="/directors/{id}/edit">Edit</a> <a class="danger" href="/directors/{id}/delete">Delete</a>"#,
            id = director.id
        )
    } else {
        String::new()
    };

    format!(
        r#"<tr><td>{name}</td><td><span class="badge">{year}</span></td><td>{by}{you}</td><td>{at}</td><td class="row-actions">{actions}</td></tr>"#,
        name = text(&director.name),
        year = year_or_na(director.birth_year),
        by = text(&director.added_by_name),
        at = text(display_date(&director.created_at)),
    )
}

/// `GET /directors?q=`
pub async fn list(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<SearchQuery>,
) -> Result<Html<String>, PageError> {
    let q = normalize_search_query(query.q.as_deref());
    let directors = state.director_service().list(q).await?;

    let mut body = back_link("/", "home page");
    let _ = write!(
        body,
        r#"<section class="card">
<div class="card-header"><h1>Directors</h1><a class="button primary" href="/directors/new">Add director</a></div>
<form method="get" action="/directors" class="search">
<input type="search" name="q" value="{}" placeholder="Search by name, birth year, by who added the director or when...">
<button type="submit" class="button outline">Search</button>
</form>"#,
        attr(q.unwrap_or_default())
    );

    if q.is_some() {
        let noun = if directors.len() == 1 { "director" } else { "directors" };
        let _ = write!(body, r#"<p class="muted">Found {} {noun}</p>"#, directors.len());
    }

    if directors.is_empty() {
        body.push_str(
            r#"<div class="empty"><h2>No directors found</h2><p class="muted">Try adjusting your search criteria!</p></div>"#,
        );
    } else {
        body.push_str(
            "<table><thead><tr><th>Name</th><th>Birth year</th><th>Added by</th><th>Added at</th><th></th></tr></thead><tbody>",
        );
        for director in &directors {
            body.push_str(&table_row(director, &user));
        }
        body.push_str("</tbody></table>");
    }
    body.push_str("</section>");

    Ok(render(&session, "Directors", Some(&user), &body).await)
}

/// `GET /directors/new`
pub async fn new_form(
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Html<String> {
    let view = WizardView {
        subject: "Director",
        mode: Mode::Add,
        action: "/directors/new",
        cancel_href: LIST,
    };
    let html = view.render_edit(&fields(&DirectorInput::default()), None);
    render(&session, &view.heading(), Some(&user), &html).await
}

/// `POST /directors/new`
pub async fn submit_new(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<DirectorForm>,
) -> Result<Response, PageError> {
    let view = WizardView {
        subject: "Director",
        mode: Mode::Add,
        action: "/directors/new",
        cancel_href: LIST,
    };

    let service = Arc::clone(state.director_service());
    let actor = user.clone();
    wizard_step(&session, &user, &view, form, move |input| async move {
        service.create(&actor, &input).await?;
        Ok((LIST.to_string(), DIRECTOR_ADDED))
    })
    .await
}

/// Loads a director the viewer may change, or explains why not with a flash.
async fn editable(
    state: &AppState,
    session: &Session,
    user: &User,
    id: i32,
    action: &'static str,
) -> Result<Result<Director, Response>, PageError> {
    match state.director_service().get(id).await {
        Ok(director) if can_modify(user, director.added_by) => Ok(Ok(director)),
        Ok(_) => {
            let message = DirectorError::Forbidden(action).to_string();
            Ok(Err(redirect_with(session, Flash::error(message), LIST).await))
        }
        Err(e @ DirectorError::NotFound(_)) => {
            Ok(Err(redirect_with(session, Flash::error(e.to_string()), LIST).await))
        }
        Err(e) => Err(e.into()),
    }
}

/// `GET /directors/{id}/edit`
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    let director = match editable(&state, &session, &user, id, "update").await? {
        Ok(director) => director,
        Err(redirect) => return Ok(redirect),
    };

    let action = format!("/directors/{id}/edit");
    let view = WizardView {
        subject: "Director",
        mode: Mode::Edit,
        action: &action,
        cancel_href: LIST,
    };
    let html = view.render_edit(&fields(&DirectorInput::from(&director)), None);
    Ok(render(&session, &view.heading(), Some(&user), &html)
        .await
        .into_response())
}

/// `POST /directors/{id}/edit`
pub async fn submit_edit(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Form(form): Form<DirectorForm>,
) -> Result<Response, PageError> {
    let action = format!("/directors/{id}/edit");
    let view = WizardView {
        subject: "Director",
        mode: Mode::Edit,
        action: &action,
        cancel_href: LIST,
    };

    let service = Arc::clone(state.director_service());
    let actor = user.clone();
    wizard_step(&session, &user, &view, form, move |input| async move {
        service.update(&actor, id, &input).await?;
        Ok((LIST.to_string(), DIRECTOR_UPDATED))
    })
    .await
}

/// `GET /directors/{id}/delete`: confirmation screen.
pub async fn confirm_delete(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    let director = match editable(&state, &session, &user, id, "delete").await? {
        Ok(director) => director,
        Err(redirect) => return Ok(redirect),
    };

    let body = format!(
        r#"<section class="card narrow">
<h1>Delete Director</h1>
<p>Are you sure you want to delete <strong>"{name}"</strong>?<br>
This action cannot be undone and will fail if the director has associated movies.</p>
<form method="post" action="/directors/{id}/delete" class="actions">
<a class="button outline" href="{LIST}">Cancel</a>
<button type="submit" class="button danger">Delete Director</button>
</form>
</section>"#,
        name = text(&director.name),
    );

    Ok(render(&session, "Delete Director", Some(&user), &body)
        .await
        .into_response())
}

/// `POST /directors/{id}/delete`
pub async fn delete(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    match state.director_service().delete(&user, id).await {
        Ok(_) => Ok(redirect_with(&session, Flash::success(DIRECTOR_DELETED), LIST).await),
        Err(e @ (DirectorError::Database(_) | DirectorError::Internal(_))) => Err(e.into()),
        Err(e) => Ok(redirect_with(&session, Flash::error(e.to_string()), LIST).await),
    }
}
