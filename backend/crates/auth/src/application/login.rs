//! Login Use Case
//!
//! Verifies credentials and issues an access/refresh token pair, plus a
//! rotated remember token when "remember me" is requested.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, remember_token::RememberToken, user_password::RawPassword,
};
use crate::error::{AuthError, AuthResult};
use crate::token::{Claims, TokenType};

/// Login input
pub struct LoginInput {
    pub email: String,
    pub password: String,
    /// Remember me flag
    pub remember: bool,
}

/// Login output
pub struct LoginOutput {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
    /// Set when the client asked to be remembered; goes in an HttpOnly cookie
    pub remember_token: Option<RememberToken>,
}

/// Login use case
pub struct LoginUseCase<R>
where
    R: UserRepository,
{
    users: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository,
{
    pub fn new(users: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { users, config }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        // Unknown email, unparseable email and wrong password all surface
        // as the same InvalidCredentials: responses must not reveal which
        // accounts exist
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let raw_password =
            RawPassword::new(input.password).map_err(|_| AuthError::InvalidCredentials)?;

        if !user.password_hash.verify(&raw_password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        // Status checks come only after the credentials verified, so an
        // unauthenticated caller learns nothing about account state
        if !user.can_login() {
            return Err(AuthError::AccountInactive);
        }

        if self.config.require_verified_email && !user.is_email_verified() {
            return Err(AuthError::EmailNotVerified);
        }

        let codec = self.config.codec();
        let access_token = codec.encode(&Claims::new(
            user.user_id,
            &user.email,
            user.role,
            TokenType::Access,
            self.config.access_ttl_secs(),
        ));
        let refresh_token = codec.encode(&Claims::new(
            user.user_id,
            &user.email,
            user.role,
            TokenType::Refresh,
            self.config.refresh_ttl_secs(),
        ));

        // Rotate the remember token on every remembered login;
        // concurrent logins are last-write-wins
        let remember_token = if input.remember {
            let token = RememberToken::generate();
            self.users
                .set_remember_token(user.user_id, Some(&token))
                .await?;
            Some(token)
        } else {
            None
        };

        self.users.record_login(user.user_id).await?;

        tracing::info!(
            user_id = %user.user_id,
            remember = input.remember,
            "User logged in"
        );

        let mut user = user;
        user.record_login();
        if let Some(token) = &remember_token {
            user.set_remember_token(token.clone());
        }

        Ok(LoginOutput {
            user,
            access_token,
            refresh_token,
            remember_token,
        })
    }
}
