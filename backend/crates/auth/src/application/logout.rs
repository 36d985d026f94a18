//! Logout Use Case
//!
//! Clears the persistent-login token. Best-effort: the client discards
//! its cookie regardless, so a store failure downgrades to a warning
//! instead of failing the request.

use std::sync::Arc;

use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::AuthResult;

/// Logout use case
pub struct LogoutUseCase<R>
where
    R: UserRepository,
{
    users: Arc<R>,
}

impl<R> LogoutUseCase<R>
where
    R: UserRepository,
{
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }

    pub async fn execute(&self, user_id: UserId) -> AuthResult<()> {
        match self.users.set_remember_token(user_id, None).await {
            Ok(_) => {
                tracing::info!(user_id = %user_id, "User logged out");
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Failed to clear remember token on logout"
                );
            }
        }

        Ok(())
    }
}
