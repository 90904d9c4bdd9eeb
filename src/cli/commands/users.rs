//! User management command handlers

use crate::config::Config;
use crate::db::Store;
use crate::models::Role;
use crate::services::{RegisterInput, normalize_email};

pub async fn cmd_create_user(
    config: &Config,
    name: &str,
    email: &str,
    password: &str,
    admin: bool,
) -> anyhow::Result<()> {
    let input = RegisterInput {
        name: name.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    };
    let (name, email) = input.validate(config.security.min_password_length)?;

    let store = Store::new(&config.general.database_path).await?;
    if store.get_user_by_email(&email).await?.is_some() {
        anyhow::bail!("A user with email {email} already exists");
    }

    let role = if admin { Role::Admin } else { Role::User };
    let user = store
        .create_user(&name, &email, &input.password, role, &config.security)
        .await?;

    println!("✓ Created {} account for {} (ID {})", role.as_str(), user.email, user.id);
    println!("  API key: {}", user.api_key);

    Ok(())
}

pub async fn cmd_promote(config: &Config, email: &str) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let email = normalize_email(email);

    if store.set_user_role(&email, Role::Admin).await? {
        println!("✓ {email} is now an admin");
    } else {
        println!("No user found with email {email}");
    }

    Ok(())
}

pub async fn cmd_list_users(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let users = store.list_users().await?;

    println!("Users ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        let marker = if user.is_admin() { "★" } else { "•" };
        println!("{marker} {} <{}>", user.name, user.email);
        println!("  ID: {} | Role: {} | Since: {}", user.id, user.role.as_str(), user.created_at);
    }

    Ok(())
}
