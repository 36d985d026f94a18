//! Refresh Token Use Case
//!
//! Exchanges a valid refresh token for a fresh access/refresh pair. The
//! subject is re-resolved against the store first, so tokens stop working
//! the moment an account is deactivated.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::token::{TokenPair, TokenType};

/// Refresh output: the rotated pair
pub struct RefreshOutput {
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh token use case
pub struct RefreshTokenUseCase<R>
where
    R: UserRepository,
{
    users: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RefreshTokenUseCase<R>
where
    R: UserRepository,
{
    pub fn new(users: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { users, config }
    }

    pub async fn execute(&self, refresh_token: &str) -> AuthResult<RefreshOutput> {
        let codec = self.config.codec();

        let claims = codec.decode(refresh_token, TokenType::Refresh)?;

        let user = self
            .users
            .find_by_id(claims.user_id())
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !user.can_login() {
            return Err(AuthError::AccountInactive);
        }

        let TokenPair {
            access_token,
            refresh_token,
        } = codec.refresh(
            refresh_token,
            self.config.access_ttl_secs(),
            self.config.refresh_ttl_secs(),
        )?;

        tracing::debug!(user_id = %user.user_id, "Token pair refreshed");

        Ok(RefreshOutput {
            access_token,
            refresh_token,
        })
    }
}
