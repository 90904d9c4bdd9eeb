//! Sample catalog used by the `seed` command and by local development.

use anyhow::Result;
use tracing::info;

use super::Store;
use crate::config::SecurityConfig;
use crate::models::{DirectorDraft, MovieDraft, Role, User};

pub const TEST_USER_NAME: &str = "Test User";
pub const TEST_USER_EMAIL: &str = "test@cinedex.local";
pub const TEST_USER_PASSWORD: &str = "password123";

const DIRECTORS: &[(&str, i32)] = &[
    ("Christopher Nolan", 1970),
    ("Greta Gerwig", 1983),
    ("Quentin Tarantino", 1963),
    ("Denis Villeneuve", 1967),
    ("Kovács István", 1975),
];

/// (title, release year, director, description)
const MOVIES: &[(&str, i32, &str, &str)] = &[
    (
        "Inception",
        2010,
        "Christopher Nolan",
        "A thief who steals corporate secrets through the use of dream-sharing technology...",
    ),
    (
        "Oppenheimer",
        2023,
        "Christopher Nolan",
        "The story of J. Robert Oppenheimer's role in the development of the atomic bomb.",
    ),
    (
        "Barbie",
        2023,
        "Greta Gerwig",
        "Barbie and Ken have the time of their lives in the colorful and seemingly perfect world of Barbie Land.",
    ),
    (
        "Pulp Fiction",
        1994,
        "Quentin Tarantino",
        "The lives of two mob hitmen, a boxer, a gangster and his wife, and a pair of diner bandits intertwine...",
    ),
    (
        "Dune",
        2021,
        "Denis Villeneuve",
        "A noble family becomes embroiled in a war for control over the galaxy's most valuable asset.",
    ),
];

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub user_created: bool,
    pub directors_added: usize,
    pub movies_added: usize,
}

/// Inserts the sample user, directors and movies. Rows that already exist are left alone,
/// so running it twice is harmless.
pub async fn seed_sample_data(store: &Store, security: &SecurityConfig) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    let user = if let Some(user) = store.get_user_by_email(TEST_USER_EMAIL).await? {
        user
    } else {
        report.user_created = true;
        store
            .create_user(
                TEST_USER_NAME,
                TEST_USER_EMAIL,
                TEST_USER_PASSWORD,
                Role::User,
                security,
            )
            .await?
    };

    for (name, birth_year) in DIRECTORS {
        let draft = DirectorDraft {
            name: (*name).to_string(),
            birth_year: Some(*birth_year),
        };
        if store
            .find_duplicate_director(&draft.name, draft.birth_year, None)
            .await?
            .is_none()
        {
            store.add_director(&draft, user.id).await?;
            report.directors_added += 1;
        }
    }

    report.movies_added = seed_movies(store, &user).await?;

    info!(
        directors = report.directors_added,
        movies = report.movies_added,
        "Sample data seeded"
    );

    Ok(report)
}

async fn seed_movies(store: &Store, user: &User) -> Result<usize> {
    let directors = store.list_directors().await?;
    let mut added = 0;

    for (title, year, director_name, description) in MOVIES {
        let Some(director) = directors.iter().find(|d| d.name == *director_name) else {
            continue;
        };

        if store
            .find_duplicate_movie(title, director.id, None)
            .await?
            .is_some()
        {
            continue;
        }

        let draft = MovieDraft {
            title: (*title).to_string(),
            release_year: Some(*year),
            description: Some((*description).to_string()),
            director_id: director.id,
        };
        store.add_movie(&draft, user.id).await?;
        added += 1;
    }

    Ok(added)
}
