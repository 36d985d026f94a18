//! Authenticate Use Case
//!
//! Resolves a bearer token to a user. This is the request-time gate the
//! middleware delegates to: token signature/expiry/type, then a store
//! lookup, then the active-status check.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::{AuthError, AuthResult};
use crate::token::TokenType;

/// Authenticate use case
pub struct AuthenticateUseCase<R>
where
    R: UserRepository,
{
    users: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> AuthenticateUseCase<R>
where
    R: UserRepository,
{
    pub fn new(users: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { users, config }
    }

    /// Resolve an access token to its (active) user
    pub async fn require_authentication(&self, token: &str) -> AuthResult<User> {
        let claims = self.config.codec().decode(token, TokenType::Access)?;

        // A deleted subject is indistinguishable from a bad token
        let user = self
            .users
            .find_by_id(claims.user_id())
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !user.can_login() {
            return Err(AuthError::AccountInactive);
        }

        Ok(user)
    }

    /// Resolve an access token and demand an exact role match
    ///
    /// No hierarchy: an admin token does not satisfy a check for the
    /// `User` role. Broader rights go through the permission table.
    pub async fn require_role(&self, token: &str, role: UserRole) -> AuthResult<User> {
        let user = self.require_authentication(token).await?;

        if user.role != role {
            return Err(AuthError::Forbidden);
        }

        Ok(user)
    }
}
