//! Remember Login Use Case
//!
//! Silent re-authentication from the persistent-login cookie. This path
//! never fails loudly: anything short of a matching, active account
//! resolves to `None` and the client simply falls back to the login form.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::token::{Claims, TokenType};

/// Successful silent re-authentication
pub struct RememberLoginOutput {
    pub user: User,
    pub access_token: String,
    pub refresh_token: String,
}

/// Remember login use case
pub struct RememberLoginUseCase<R>
where
    R: UserRepository,
{
    users: Arc<R>,
    config: Arc<AuthConfig>,
}

impl<R> RememberLoginUseCase<R>
where
    R: UserRepository,
{
    pub fn new(users: Arc<R>, config: Arc<AuthConfig>) -> Self {
        Self { users, config }
    }

    pub async fn execute(&self, remember_token: &str) -> AuthResult<Option<RememberLoginOutput>> {
        if remember_token.is_empty() {
            return Ok(None);
        }

        let user = match self.users.find_by_remember_token(remember_token).await {
            Ok(Some(user)) => user,
            Ok(None) => return Ok(None),
            Err(e) => {
                // Optional path: store trouble means "not remembered",
                // not a hard failure
                tracing::warn!(error = %e, "Remember-token lookup failed");
                return Ok(None);
            }
        };

        if !user.can_login() {
            return Ok(None);
        }
        if self.config.require_verified_email && !user.is_email_verified() {
            return Ok(None);
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

        tracing::info!(user_id = %user.user_id, "User re-authenticated via remember token");

        Ok(Some(RememberLoginOutput {
            user,
            access_token,
            refresh_token,
        }))
    }
}
