//! Sample data command handler

use crate::config::Config;
use crate::db::Store;
use crate::db::seed::{TEST_USER_EMAIL, TEST_USER_PASSWORD, seed_sample_data};

pub async fn cmd_seed(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let report = seed_sample_data(&store, &config.security).await?;

    if report.user_created {
        println!("✓ Created sample user {TEST_USER_EMAIL} (password: {TEST_USER_PASSWORD})");
    } else {
        println!("• Sample user {TEST_USER_EMAIL} already exists");
    }
    println!("✓ Added {} directors", report.directors_added);
    println!("✓ Added {} movies", report.movies_added);

    Ok(())
}
