//! Domain service for authentication and user management.
//!
//! Handles registration, login, password changes, and API key management.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::User;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User already exists. Use another email.")]
    UserExists,

    #[error("User not found")]
    UserNotFound,

    #[error("Registration is disabled")]
    RegistrationDisabled,

    #[error("{0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Sign-up form, shared by the JSON and HTML surfaces.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
    })
}

#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Emails are compared case-insensitively, so they are stored lowercased.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl RegisterInput {
    /// Returns the trimmed name and email when every field is acceptable.
    pub fn validate(&self, min_password_length: usize) -> Result<(String, String), AuthError> {
        let name = self.name.trim();
        if name.chars().count() < 2 {
            return Err(AuthError::Validation(
                "Name must be at least 2 characters".to_string(),
            ));
        }

        let email = normalize_email(&self.email);
        if !is_valid_email(&email) {
            return Err(AuthError::Validation("Invalid email address".to_string()));
        }

        if self.password.chars().count() < min_password_length {
            return Err(AuthError::Validation(format!(
                "Password must be at least {min_password_length} characters"
            )));
        }

        Ok((name.to_string(), email))
    }
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a regular user account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UserExists`] if the email is taken.
    async fn register(&self, input: RegisterInput) -> Result<User, AuthError>;

    /// Verifies credentials and returns the user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError>;

    /// Looks up the user a session points at.
    async fn find_user(&self, user_id: i32) -> Result<Option<User>, AuthError>;

    /// Verifies an API key and returns the associated user if valid.
    async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>, AuthError>;

    /// Changes a user's password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] if current password is incorrect or new password invalid.
    async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError>;

    /// Gets the current API key for a user.
    async fn get_api_key(&self, user_id: i32) -> Result<String, AuthError>;

    /// Regenerates the API key for a user and returns the new one.
    async fn regenerate_api_key(&self, user_id: i32) -> Result<String, AuthError>;
}
