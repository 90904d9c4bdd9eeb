//! Catalog listing command handlers

use crate::config::Config;
use crate::db::Store;
use crate::services::filter::{filter_directors, filter_movies};

pub async fn cmd_list_directors(config: &Config, query: Option<&str>) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let directors = filter_directors(store.list_directors().await?, query);

    if directors.is_empty() {
        println!("No directors found.");
        println!();
        println!("Add sample data with: cinedex seed");
        return Ok(());
    }

    println!("Directors ({} total)", directors.len());
    println!("{:-<70}", "");

    for director in directors {
        let born = director
            .birth_year
            .map_or_else(|| "N/A".to_string(), |y| y.to_string());
        println!("• {} (born {born})", director.name);
        println!("  ID: {} | Added by: {}", director.id, director.added_by_name);
    }

    Ok(())
}

pub async fn cmd_list_movies(config: &Config, query: Option<&str>) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let movies = filter_movies(store.list_movies().await?, query);

    if movies.is_empty() {
        println!("No movies found.");
        println!();
        println!("Add sample data with: cinedex seed");
        return Ok(());
    }

    println!("Movies ({} total)", movies.len());
    println!("{:-<70}", "");

    for movie in movies {
        let year = movie
            .release_year
            .map_or_else(|| "N/A".to_string(), |y| y.to_string());
        println!("• {} [{year}]", movie.title);
        println!(
            "  ID: {} | Director: {} | Added by: {}",
            movie.id, movie.director.name, movie.added_by_user.name
        );
    }

    Ok(())
}
