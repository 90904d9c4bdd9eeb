//! `SeaORM` implementation of the `AuthService` trait.

use crate::config::SecurityConfig;
use crate::db::{Store, is_unique_violation};
use crate::models::{Role, User};
use crate::services::auth_service::{AuthError, AuthService, RegisterInput, normalize_email};
use async_trait::async_trait;
use tracing::info;

pub struct SeaOrmAuthService {
    store: Store,
    security: SecurityConfig,
    allow_registration: bool,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store, security: SecurityConfig, allow_registration: bool) -> Self {
        Self {
            store,
            security,
            allow_registration,
        }
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        if !self.allow_registration {
            return Err(AuthError::RegistrationDisabled);
        }

        let (name, email) = input.validate(self.security.min_password_length)?;

        if self.store.get_user_by_email(&email).await?.is_some() {
            return Err(AuthError::UserExists);
        }

        let user = self
            .store
            .create_user(&name, &email, &input.password, Role::User, &self.security)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    AuthError::UserExists
                } else {
                    AuthError::from(e)
                }
            })?;

        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = normalize_email(email);

        let is_valid = self.store.verify_user_password(&email, password).await?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        self.store
            .get_user_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    async fn find_user(&self, user_id: i32) -> Result<Option<User>, AuthError> {
        Ok(self.store.get_user(user_id).await?)
    }

    async fn verify_api_key(&self, api_key: &str) -> Result<Option<User>, AuthError> {
        Ok(self.store.verify_api_key(api_key).await?)
    }

    async fn change_password(
        &self,
        user_id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let min = self.security.min_password_length;
        if new_password.chars().count() < min {
            return Err(AuthError::Validation(format!(
                "New password must be at least {min} characters"
            )));
        }

        if current_password == new_password {
            return Err(AuthError::Validation(
                "New password must be different from current password".to_string(),
            ));
        }

        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let is_valid = self
            .store
            .verify_user_password(&user.email, current_password)
            .await?;

        if !is_valid {
            return Err(AuthError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        self.store
            .update_user_password(user_id, new_password, &self.security)
            .await?;

        Ok(())
    }

    async fn get_api_key(&self, user_id: i32) -> Result<String, AuthError> {
        self.store
            .get_user_api_key(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    async fn regenerate_api_key(&self, user_id: i32) -> Result<String, AuthError> {
        if self.store.get_user(user_id).await?.is_none() {
            return Err(AuthError::UserNotFound);
        }

        let new_api_key = self.store.regenerate_user_api_key(user_id).await?;
        info!(user_id, "API key regenerated");
        Ok(new_api_key)
    }
}
