//! User Entity
//!
//! The single account record: profile data, credentials and
//! persistent-login state. The id is assigned by the database, so a `User`
//! value only exists for a persisted row; new accounts start life as a
//! [`NewUser`].

use chrono::{DateTime, Utc};

use crate::domain::value_object::{
    email::Email, permission::Permission, remember_token::RememberToken, user_id::UserId,
    user_password::UserPassword, user_role::UserRole,
};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    /// Database-assigned identifier, immutable
    pub user_id: UserId,
    /// Unique, lowercased email (login identifier)
    pub email: Email,
    /// Argon2id PHC hash
    pub password_hash: UserPassword,
    /// Role (User, Admin)
    pub role: UserRole,
    /// Whether the account may authenticate
    pub is_active: bool,
    /// When the email address was confirmed, if ever
    pub email_verified_at: Option<DateTime<Utc>>,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Persistent-login token, if a remembered session exists
    pub remember_token: Option<RememberToken>,
    /// Last successful login time
    pub last_login_at: Option<DateTime<Utc>>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

/// Fields for a not-yet-persisted account
///
/// The repository turns this into a [`User`] by inserting the row and
/// reading back the assigned id and timestamps.
#[derive(Debug)]
pub struct NewUser {
    pub email: Email,
    pub password_hash: UserPassword,
    pub role: UserRole,
    pub is_active: bool,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    /// A freshly registered visitor account: default role, active,
    /// email not yet verified
    pub fn registration(
        email: Email,
        password_hash: UserPassword,
        first_name: String,
        last_name: String,
    ) -> Self {
        Self {
            email,
            password_hash,
            role: UserRole::default(),
            is_active: true,
            first_name,
            last_name,
        }
    }
}

impl User {
    /// Check if the account may authenticate
    pub fn can_login(&self) -> bool {
        self.is_active
    }

    /// Check if the email address has been confirmed
    pub fn is_email_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }

    /// Check a capability from the static permission table
    pub fn can(&self, permission: Permission) -> bool {
        permission.granted_to(self.role)
    }

    /// Whether deactivating this account would remove the last active
    /// admin. `active_admin_count` is the store's current count,
    /// including this user.
    pub fn blocks_deactivation(&self, active_admin_count: i64) -> bool {
        self.is_active && self.role.is_admin() && active_admin_count <= 1
    }

    /// Record successful login
    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    /// Attach a rotated remember token
    pub fn set_remember_token(&mut self, token: RememberToken) {
        self.remember_token = Some(token);
        self.updated_at = Utc::now();
    }

    /// Drop the persistent-login state
    pub fn clear_remember_token(&mut self) {
        self.remember_token = None;
        self.updated_at = Utc::now();
    }

    /// Update the active flag
    pub fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.updated_at = Utc::now();
    }

    /// Mark the email address as confirmed
    pub fn mark_email_verified(&mut self) {
        let now = Utc::now();
        self.email_verified_at = Some(now);
        self.updated_at = now;
    }
}
