//! Account Status Use Case
//!
//! Activates or deactivates an account. The one invariant enforced here:
//! the last active admin can never be deactivated, or nobody could
//! administer the system. The policy itself is a pure function on the
//! entity (`User::blocks_deactivation`) so it is testable with a stubbed
//! count.

use std::sync::Arc;

use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// Account status use case
pub struct AccountStatusUseCase<R>
where
    R: UserRepository,
{
    users: Arc<R>,
}

impl<R> AccountStatusUseCase<R>
where
    R: UserRepository,
{
    pub fn new(users: Arc<R>) -> Self {
        Self { users }
    }

    pub async fn set_active(&self, user_id: UserId, active: bool) -> AuthResult<()> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !active {
            let active_admins = self.users.count_active_admins().await?;
            if user.blocks_deactivation(active_admins) {
                return Err(AuthError::LastActiveAdmin);
            }
        }

        if !self.users.update_active_status(user_id, active).await? {
            return Err(AuthError::UserNotFound);
        }

        // A deactivated account must not keep a silent way back in
        if !active {
            if let Err(e) = self.users.set_remember_token(user_id, None).await {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Failed to clear remember token on deactivation"
                );
            }
        }

        tracing::info!(user_id = %user_id, active = active, "Account status updated");

        Ok(())
    }
}
