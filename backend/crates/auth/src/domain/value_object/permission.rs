//! Permission Capability Table
//!
//! Static mapping from role to capability. This is the single source of
//! truth for "what can this role do"; role checks elsewhere are strict
//! equality and never infer rights from a hierarchy.

use super::user_role::UserRole;
use std::fmt;

/// Capabilities a resolved user may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Manage other user accounts (activate, deactivate, change roles)
    ManageUsers,
    /// View one's own profile
    ViewProfile,
}

impl Permission {
    /// Whether `role` holds this capability
    pub const fn granted_to(&self, role: UserRole) -> bool {
        match self {
            Permission::ManageUsers => role.is_admin(),
            Permission::ViewProfile => true,
        }
    }

    pub const fn code(&self) -> &'static str {
        match self {
            Permission::ManageUsers => "manage_users",
            Permission::ViewProfile => "view_profile",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manage_users_is_admin_only() {
        assert!(Permission::ManageUsers.granted_to(UserRole::Admin));
        assert!(!Permission::ManageUsers.granted_to(UserRole::User));
    }

    #[test]
    fn test_view_profile_for_any_resolved_user() {
        assert!(Permission::ViewProfile.granted_to(UserRole::User));
        assert!(Permission::ViewProfile.granted_to(UserRole::Admin));
    }
}
