//! Search over already loaded catalog rows.

use crate::models::{Director, Movie};

/// Normalized search term, or `None` when the query should match everything.
fn normalize(query: Option<&str>) -> Option<String> {
    query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase)
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

fn year_contains(year: Option<i32>, needle: &str) -> bool {
    year.is_some_and(|y| y.to_string().contains(needle))
}

#[must_use]
pub fn director_matches(director: &Director, term: &str) -> bool {
    contains(&director.name, term)
        || year_contains(director.birth_year, term)
        || contains(&director.added_by_name, term)
        || contains(&director.created_at, term)
}

#[must_use]
pub fn movie_matches(movie: &Movie, term: &str) -> bool {
    contains(&movie.title, term)
        || contains(&movie.director.name, term)
        || year_contains(movie.release_year, term)
}

/// Keeps the directors matching `query`, preserving order.
#[must_use]
pub fn filter_directors(directors: Vec<Director>, query: Option<&str>) -> Vec<Director> {
    match normalize(query) {
        Some(term) => directors
            .into_iter()
            .filter(|d| director_matches(d, &term))
            .collect(),
        None => directors,
    }
}

/// Keeps the movies matching `query`, preserving order.
#[must_use]
pub fn filter_movies(movies: Vec<Movie>, query: Option<&str>) -> Vec<Movie> {
    match normalize(query) {
        Some(term) => movies
            .into_iter()
            .filter(|m| movie_matches(m, &term))
            .collect(),
        None => movies,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DirectorSummary, UserSummary};

    fn director(name: &str, birth_year: Option<i32>, added_by: &str, created_at: &str) -> Director {
        Director {
            id: 1,
            name: name.to_string(),
            birth_year,
            added_by: 1,
            added_by_name: added_by.to_string(),
            created_at: created_at.to_string(),
        }
    }

    fn movie(title: &str, year: Option<i32>, director: &str) -> Movie {
        Movie {
            id: 1,
            title: title.to_string(),
            release_year: year,
            description: Some("Never searched".to_string()),
            director_id: 1,
            user_id: 1,
            created_at: "2025-01-01T00:00:00.000000Z".to_string(),
            director: DirectorSummary {
                id: 1,
                name: director.to_string(),
                birth_year: None,
            },
            added_by_user: UserSummary {
                id: 1,
                name: "Ann".to_string(),
            },
        }
    }

    fn sample_directors() -> Vec<Director> {
        vec![
            director("Greta Gerwig", Some(1983), "Ann", "2025-03-14T10:00:00.000000Z"),
            director("Christopher Nolan", Some(1970), "Bob", "2024-11-02T08:30:00.000000Z"),
            director("Anonymous", None, "Unknown user", "2025-06-01T12:00:00.000000Z"),
        ]
    }

    #[test]
    fn test_blank_query_keeps_everything() {
        assert_eq!(filter_directors(sample_directors(), None).len(), 3);
        assert_eq!(filter_directors(sample_directors(), Some("   ")).len(), 3);
    }

    #[test]
    fn test_director_search_fields() {
        let by_name = filter_directors(sample_directors(), Some("NOLAN"));
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].name, "Christopher Nolan");

        let by_year = filter_directors(sample_directors(), Some("198"));
        assert_eq!(by_year[0].name, "Greta Gerwig");

        let by_creator = filter_directors(sample_directors(), Some("bob"));
        assert_eq!(by_creator[0].name, "Christopher Nolan");

        let by_date = filter_directors(sample_directors(), Some("2025-06-01"));
        assert_eq!(by_date.len(), 1);
        assert_eq!(by_date[0].name, "Anonymous");
    }

    #[test]
    fn test_movie_search_fields() {
        let movies = vec![
            movie("Inception", Some(2010), "Christopher Nolan"),
            movie("Barbie", Some(2023), "Greta Gerwig"),
            movie("Untitled", None, "Someone"),
        ];

        assert_eq!(filter_movies(movies.clone(), Some(" incep ")).len(), 1);
        assert_eq!(filter_movies(movies.clone(), Some("gerwig"))[0].title, "Barbie");
        assert_eq!(filter_movies(movies.clone(), Some("2010"))[0].title, "Inception");
        assert!(filter_movies(movies.clone(), Some("never searched")).is_empty());
        assert_eq!(filter_movies(movies, Some("")).len(), 3);
    }
}
