//! Repository Trait
//!
//! Persistence interface for user records. Implementation is in the
//! infrastructure layer. Every mutation is a single-row statement:
//! concurrent logins overwriting the remember token are last-write-wins
//! by contract.

use crate::domain::entity::user::{NewUser, User};
use crate::domain::value_object::{
    email::Email, remember_token::RememberToken, user_id::UserId,
};
use crate::error::AuthResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user, returning the persisted record with its
    /// database-assigned id
    async fn create(&self, new_user: NewUser) -> AuthResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Find user by (normalized) email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find user by persistent-login token
    async fn find_by_remember_token(&self, token: &str) -> AuthResult<Option<User>>;

    /// Set or clear the active flag; returns false if no such user
    async fn update_active_status(&self, user_id: UserId, active: bool) -> AuthResult<bool>;

    /// Set or clear the remember token; returns false if no such user
    async fn set_remember_token(
        &self,
        user_id: UserId,
        token: Option<&RememberToken>,
    ) -> AuthResult<bool>;

    /// Stamp a successful login
    async fn record_login(&self, user_id: UserId) -> AuthResult<()>;

    /// Number of active admin accounts; callers use this to refuse
    /// deactivating the last one
    async fn count_active_admins(&self) -> AuthResult<i64>;
}
