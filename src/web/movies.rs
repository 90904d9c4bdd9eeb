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
use super::html::{attr, display_date, text, truncate, year_or_na};
use super::layout::back_link;
use super::wizard::{Mode, Outcome, Step, WizardView, advance};
use super::{PageError, redirect_with, render};
use crate::api::AppState;
use crate::api::auth::CurrentUser;
use crate::api::validation::normalize_search_query;
use crate::models::movie::RELEASE_YEAR_LOOKAHEAD;
use crate::models::{Director, MIN_YEAR, Movie, MovieInput, User, current_year};
use crate::services::can_modify;
use crate::services::movie_service::{MOVIE_ADDED, MOVIE_DELETED, MOVIE_UPDATED, MovieError};

const LIST: &str = "/movies";
const NOT_FOUND_MESSAGE: &str = "No movies were found with given ID.";

#[derive(Debug, Default, Deserialize)]
pub struct MoviesQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MovieForm {
    #[serde(default)]
    pub step: Option<String>,
    #[serde(flatten)]
    pub input: MovieInput,
}

fn detail_href(id: i32) -> String {
    format!("/movies?id={id}")
}

/// Summary card used by the movie list and the home page.
pub fn movie_card(movie: &Movie, viewer: &User, preview_chars: usize) -> String {
    let you = if movie.user_id == viewer.id { " (You)" } else { "" };
    let description = movie
        .description
        .as_deref()
        .map_or_else(String::new, |d| {
            format!(r#"<p>{}</p>"#, text(&truncate(d, preview_chars)))
        });

    format!(
        r#"<article class="movie-card">
<h3><a href="{href}">{title}</a></h3>
<p class="meta"><span class="badge">{year}</span> {director}</p>
{description}
<p class="muted">Added by {by}{you}</p>
</article>"#,
        href = attr(&detail_href(movie.id)),
        title = text(&movie.title),
        year = year_or_na(movie.release_year),
        director = text(&movie.director.name),
        by = text(&movie.added_by_user.name),
    )
}

fn fields(input: &MovieInput, directors: &[Director]) -> String {
    let selected = input.director_id.as_deref().map(str::trim);

    let mut options = String::from(r#"<option value="">Select a director</option>"#);
    for director in directors {
        let id = director.id.to_string();
        let is_selected = if selected == Some(id.as_str()) { " selected" } else { "" };
        let _ = write!(
            options,
            r#"<option value="{id}"{is_selected}>{}</option>"#,
            text(&director.name)
        );
    }

    let hint = if directors.is_empty() {
        r#"<p class="muted">There are no directors yet. <a href="/directors/new">Add a director</a> first.</p>"#
    } else {
        ""
    };

    format!(
        r#"<label>Title <input type="text" name="title" value="{title}" maxlength="255" required></label>
<label>Release year <input type="number" name="release_year" value="{year}" min="{MIN_YEAR}" max="{max}" placeholder="Optional"></label>
<label>Director <select name="director_id" required>{options}</select></label>
{hint}
<label>Description <textarea name="description" rows="4" placeholder="Optional">{description}</textarea></label>"#,
        title = attr(&input.title),
        year = attr(input.release_year.as_deref().unwrap_or_default()),
        max = current_year() + RELEASE_YEAR_LOOKAHEAD,
        description = text(input.description.as_deref().unwrap_or_default()),
    )
}

async fn wizard_step<F, Fut>(
    state: &AppState,
    session: &Session,
    user: &User,
    view: &WizardView<'_>,
    form: MovieForm,
    commit: F,
) -> Result<Response, PageError>
where
    F: FnOnce(MovieInput) -> Fut,
    Fut: Future<Output = Result<(String, &'static str), MovieError>>,
{
    let directors = state.director_service().list(None).await?;
    let step = Step::parse(form.step.as_deref());
    let title = view.heading();

    let html = match advance(step, form.input.validate(current_year())) {
        Outcome::Edit(error) => {
            view.render_edit(&fields(&form.input, &directors), error.as_deref())
        }
        Outcome::Review(draft) => {
            let director_name = directors
                .iter()
                .find(|d| d.id == draft.director_id)
                .map_or("Unknown director", |d| d.name.as_str());

            view.render_review(
                &[
                    ("Title", draft.title.clone()),
                    ("Release year", year_or_na(draft.release_year)),
                    ("Director", director_name.to_string()),
                    (
                        "Description",
                        draft
                            .description
                            .clone()
                            .unwrap_or_else(|| "No description".to_string()),
                    ),
                ],
                &[
                    ("title", form.input.title.clone()),
                    (
                        "release_year",
                        form.input.release_year.clone().unwrap_or_default(),
                    ),
                    (
                        "director_id",
                        form.input.director_id.clone().unwrap_or_default(),
                    ),
                    (
                        "description",
                        form.input.description.clone().unwrap_or_default(),
                    ),
                ],
            )
        }
        Outcome::Commit(_) => {
            let input = form.input.clone();
            match commit(form.input).await {
                Ok((to, message)) => {
                    return Ok(redirect_with(session, Flash::success(message), &to).await);
                }
                Err(e @ (MovieError::Database(_) | MovieError::Internal(_))) => {
                    return Err(e.into());
                }
                Err(e) => view.render_edit(&fields(&input, &directors), Some(&e.to_string())),
            }
        }
    };

    Ok(render(session, &title, Some(user), &html).await.into_response())
}

/// `GET /movies?q=` lists movies, `GET /movies?id=N` shows one.
pub async fn index(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<MoviesQuery>,
) -> Result<Html<String>, PageError> {
    if let Some(raw_id) = query.id.as_deref() {
        return detail(&state, &session, &user, raw_id).await;
    }

    let q = normalize_search_query(query.q.as_deref());
    let movies = state.movie_service().list(q).await?;
    let preview = state.config().catalog.description_preview_chars;

    let mut body = back_link("/", "home page");
    let _ = write!(
        body,
        r#"<section class="card">
<div class="card-header"><h1>Movies</h1><a class="button primary" href="/movies/new">Add movie</a></div>
<form method="get" action="/movies" class="search">
<input type="search" name="q" value="{}" placeholder="Search by title, director or release year...">
<button type="submit" class="button outline">Search</button>
</form>"#,
        attr(q.unwrap_or_default())
    );

    if q.is_some() {
        let noun = if movies.len() == 1 { "movie" } else { "movies" };
        let _ = write!(body, r#"<p class="muted">Found {} {noun}</p>"#, movies.len());
    }

    if movies.is_empty() {
        body.push_str(
            r#"<div class="empty"><h2>No movies found</h2><p class="muted">Try adjusting your search criteria!</p></div>"#,
        );
    } else {
        body.push_str(r#"<div class="cards">"#);
        for movie in &movies {
            body.push_str(&movie_card(movie, &user, preview));
        }
        body.push_str("</div>");
    }
    body.push_str("</section>");

    Ok(render(&session, "Movies", Some(&user), &body).await)
}

async fn detail(
    state: &AppState,
    session: &Session,
    user: &User,
    raw_id: &str,
) -> Result<Html<String>, PageError> {
    let movie = match raw_id.trim().parse::<i32>() {
        Ok(id) => match state.movie_service().get(id).await {
            Ok(movie) => Some(movie),
            Err(MovieError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        },
        Err(_) => None,
    };

    let Some(movie) = movie else {
        let body = format!(
            r#"<section class="card narrow empty">
<h1>{NOT_FOUND_MESSAGE}</h1>
<p><a class="button outline" href="{LIST}">Back to all movies</a></p>
</section>"#
        );
        return Ok(render(session, "Movie not found", Some(user), &body).await);
    };

    let you = if movie.user_id == user.id { " (You)" } else { "" };
    let controls = if can_modify(user, movie.user_id) {
        format!(
            r#"<div class="row-actions"><a class="button outline" href="/movies/{id}/edit">Edit movie</a> <a class="button danger" href="/movies/{id}/delete">Delete movie</a></div>"#,
            id = movie.id
        )
    } else {
        String::new()
    };

    let mut body = back_link(LIST, "all movies");
    let _ = write!(
        body,
        r#"<section class="card">
<div class="card-header"><h1>{title}</h1>{controls}</div>
<dl class="details">
<dt>Director</dt><dd><a href="/directors">{director}</a></dd>
<dt>Released in</dt><dd><span class="badge">{year}</span></dd>
<dt>Added by</dt><dd>{by}{you}</dd>
<dt>Added at</dt><dd>{at}</dd>
<dt class="wide">Description</dt><dd class="wide">{description}</dd>
</dl>
</section>"#,
        title = text(&movie.title),
        director = text(&movie.director.name),
        year = year_or_na(movie.release_year),
        by = text(&movie.added_by_user.name),
        at = text(display_date(&movie.created_at)),
        description = text(
            movie
                .description
                .as_deref()
                .unwrap_or("There is no description for the movie.")
        ),
    );

    Ok(render(session, &movie.title, Some(user), &body).await)
}

/// `GET /movies/new`
pub async fn new_form(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Html<String>, PageError> {
    let directors = state.director_service().list(None).await?;
    let view = WizardView {
        subject: "Movie",
        mode: Mode::Add,
        action: "/movies/new",
        cancel_href: LIST,
    };
    let html = view.render_edit(&fields(&MovieInput::default(), &directors), None);
    Ok(render(&session, &view.heading(), Some(&user), &html).await)
}

/// `POST /movies/new`
pub async fn submit_new(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Form(form): Form<MovieForm>,
) -> Result<Response, PageError> {
    let view = WizardView {
        subject: "Movie",
        mode: Mode::Add,
        action: "/movies/new",
        cancel_href: LIST,
    };

    let service = Arc::clone(state.movie_service());
    let actor = user.clone();
    wizard_step(&state, &session, &user, &view, form, move |input| async move {
        let movie = service.create(&actor, &input).await?;
        Ok((detail_href(movie.id), MOVIE_ADDED))
    })
    .await
}

/// Loads a movie the viewer may change, or explains why not with a flash.
async fn editable(
    state: &AppState,
    session: &Session,
    user: &User,
    id: i32,
    action: &'static str,
) -> Result<Result<Movie, Response>, PageError> {
    match state.movie_service().get(id).await {
        Ok(movie) if can_modify(user, movie.user_id) => Ok(Ok(movie)),
        Ok(movie) => {
            let message = MovieError::Forbidden(action).to_string();
            Ok(Err(
                redirect_with(session, Flash::error(message), &detail_href(movie.id)).await,
            ))
        }
        Err(e @ MovieError::NotFound(_)) => {
            Ok(Err(redirect_with(session, Flash::error(e.to_string()), LIST).await))
        }
        Err(e) => Err(e.into()),
    }
}

/// `GET /movies/{id}/edit`
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    let movie = match editable(&state, &session, &user, id, "update").await? {
        Ok(movie) => movie,
        Err(redirect) => return Ok(redirect),
    };

    let directors = state.director_service().list(None).await?;
    let action = format!("/movies/{id}/edit");
    let cancel = detail_href(id);
    let view = WizardView {
        subject: "Movie",
        mode: Mode::Edit,
        action: &action,
        cancel_href: &cancel,
    };
    let html = view.render_edit(&fields(&MovieInput::from(&movie), &directors), None);
    Ok(render(&session, &view.heading(), Some(&user), &html)
        .await
        .into_response())
}

/// `POST /movies/{id}/edit`
pub async fn submit_edit(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
    Form(form): Form<MovieForm>,
) -> Result<Response, PageError> {
    let action = format!("/movies/{id}/edit");
    let cancel = detail_href(id);
    let view = WizardView {
        subject: "Movie",
        mode: Mode::Edit,
        action: &action,
        cancel_href: &cancel,
    };

    let service = Arc::clone(state.movie_service());
    let actor = user.clone();
    wizard_step(&state, &session, &user, &view, form, move |input| async move {
        service.update(&actor, id, &input).await?;
        Ok((detail_href(id), MOVIE_UPDATED))
    })
    .await
}

/// `GET /movies/{id}/delete`: confirmation screen.
pub async fn confirm_delete(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    let movie = match editable(&state, &session, &user, id, "delete").await? {
        Ok(movie) => movie,
        Err(redirect) => return Ok(redirect),
    };

    let body = format!(
        r#"<section class="card narrow">
<h1>Delete Movie</h1>
<p>Are you sure you want to delete <strong>"{title}"</strong>?<br>
This action cannot be undone.</p>
<form method="post" action="/movies/{id}/delete" class="actions">
<a class="button outline" href="{cancel}">Cancel</a>
<button type="submit" class="button danger">Delete Movie</button>
</form>
</section>"#,
        title = text(&movie.title),
        cancel = attr(&detail_href(id)),
    );

    Ok(render(&session, "Delete Movie", Some(&user), &body)
        .await
        .into_response())
}

/// `POST /movies/{id}/delete`
pub async fn delete(
    State(state): State<Arc<AppState>>,
    session: Session,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i32>,
) -> Result<Response, PageError> {
    match state.movie_service().delete(&user, id).await {
        Ok(movie) => Ok(redirect_with(
            &session,
            Flash::success(format!("{MOVIE_DELETED} ({})", movie.title)),
            LIST,
        )
        .await),
        Err(e @ (MovieError::Database(_) | MovieError::Internal(_))) => Err(e.into()),
        Err(e) => Ok(redirect_with(&session, Flash::error(e.to_string()), LIST).await),
    }
}
