use axum::{extract::State, http::HeaderMap, response::Html};
use std::sync::Arc;
use tower_sessions::Session;

use super::movies::movie_card;
use super::{PageError, render};
use crate::api::AppState;
use crate::api::auth::resolve_user;

/// `GET /`: public landing page. Signed in visitors also get the latest additions.
pub async fn index(
    State(state): State<Arc<AppState>>,
    session: Session,
    headers: HeaderMap,
) -> Result<Html<String>, PageError> {
    let user = resolve_user(&state, &session, &headers).await?;

    let latest_html = match &user {
        Some(viewer) => {
            let limit = state.config().catalog.latest_movies_limit;
            let latest = state.movie_service().latest(limit).await?;
            let preview = state.config().catalog.description_preview_chars;

            if latest.is_empty() {
                r#"<section class="latest"><h2>Latest movies</h2><p class="muted">No movies have been added yet.</p></section>"#
                    .to_string()
            } else {
                let cards: String = latest
                    .iter()
                    .map(|m| movie_card(m, viewer, preview))
                    .collect();
                format!(
                    r#"<section class="latest"><h2>Latest movies</h2><div class="cards">{cards}</div></section>"#
                )
            }
        }
        None => r#"<p class="muted"><a href="/login">Log in</a> or <a href="/register">create an account</a> to browse the catalog.</p>"#
            .to_string(),
    };

    let body = format!(
        r#"<section class="hero">
<h1>Discover Your Next <span class="accent">Favorite Movie</span></h1>
<p>Explore movies and directors added by users, add your favorite movie or director. Find your perfect film to watch tonight.</p>
<div class="actions center">
<a class="button primary" href="/movies">Browse Movies</a>
<a class="button outline" href="/directors">Browse Directors</a>
</div>
</section>
{latest_html}"#
    );

    Ok(render(&session, "Home", user.as_ref(), &body).await)
}
