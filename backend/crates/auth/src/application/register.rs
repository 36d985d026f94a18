//! Register Use Case
//!
//! Creates a new visitor account.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email,
    user_password::{RawPassword, UserPassword},
};
use crate::error::{AuthError, AuthResult};

/// Register input
pub struct RegisterInput {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// Register use case
pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    users: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RegisterUseCase<R>
where
    R: UserRepository,
{
    pub fn new(users: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { users, config }
    }

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<User> {
        // Normalize and validate the email
        let email = Email::new(input.email)?;

        // Uniqueness check; the database constraint backs this up against
        // concurrent registrations
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        // Policy check, then hash
        let raw_password = RawPassword::new(input.password)
            .map_err(|e| AuthError::WeakPassword(e.to_string()))?;
        let password_hash = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let new_user = NewUser::registration(
            email,
            password_hash,
            input.first_name.trim().to_string(),
            input.last_name.trim().to_string(),
        );

        let user = self.users.create(new_user).await?;

        tracing::info!(
            user_id = %user.user_id,
            email = %user.email,
            "User registered"
        );

        Ok(user)
    }
}
