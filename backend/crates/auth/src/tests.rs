//! Use-case tests for the auth crate
//!
//! Runs the application layer end-to-end against an in-memory repository.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::application::{
    AccountStatusUseCase, AuthConfig, AuthenticateUseCase, LoginInput, LoginUseCase,
    LogoutUseCase, RefreshTokenUseCase, RegisterInput, RegisterUseCase, RememberLoginUseCase,
};
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, remember_token::RememberToken, user_id::UserId,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};
use crate::token::TokenType;

// ============================================================================
// In-memory repository
// ============================================================================

struct InMemoryUsers {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUsers {
    fn new() -> Self {
        Self {
            users: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Test-only backdoor: flip the verified timestamp directly
    fn mark_verified(&self, user_id: UserId) {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.user_id == user_id) {
            user.email_verified_at = Some(Utc::now());
        }
    }
}

impl UserRepository for InMemoryUsers {
    async fn create(&self, new_user: NewUser) -> AuthResult<User> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|u| u.email == new_user.email) {
            return Err(AuthError::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            user_id: UserId::from_i64(self.next_id.fetch_add(1, Ordering::SeqCst)),
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            is_active: new_user.is_active,
            email_verified_at: None,
            first_name: new_user.first_name,
            last_name: new_user.last_name,
            remember_token: None,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        };

        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.user_id == user_id).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| &u.email == email).cloned())
    }

    async fn find_by_remember_token(&self, token: &str) -> AuthResult<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| {
                u.remember_token
                    .as_ref()
                    .is_some_and(|t| t.matches(token))
            })
            .cloned())
    }

    async fn update_active_status(&self, user_id: UserId, active: bool) -> AuthResult<bool> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.user_id == user_id) {
            Some(user) => {
                user.set_active(active);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_remember_token(
        &self,
        user_id: UserId,
        token: Option<&RememberToken>,
    ) -> AuthResult<bool> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.user_id == user_id) {
            Some(user) => {
                match token {
                    Some(token) => user.set_remember_token(token.clone()),
                    None => user.clear_remember_token(),
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn record_login(&self, user_id: UserId) -> AuthResult<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.iter_mut().find(|u| u.user_id == user_id) {
            user.record_login();
        }
        Ok(())
    }

    async fn count_active_admins(&self) -> AuthResult<i64> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .filter(|u| u.role.is_admin() && u.is_active)
            .count() as i64)
    }
}

// ============================================================================
// Helpers
// ============================================================================

const PASSWORD: &str = "Abcd1234";

fn setup() -> (Arc<InMemoryUsers>, Arc<AuthConfig>) {
    (
        Arc::new(InMemoryUsers::new()),
        Arc::new(AuthConfig::development()),
    )
}

async fn register_visitor(
    users: &Arc<InMemoryUsers>,
    config: &Arc<AuthConfig>,
    email: &str,
) -> User {
    RegisterUseCase::new(users.clone(), config.clone())
        .execute(RegisterInput {
            email: email.to_string(),
            password: PASSWORD.to_string(),
            first_name: "Claire".to_string(),
            last_name: "Fontaine".to_string(),
        })
        .await
        .unwrap()
}

async fn seed_admin(users: &Arc<InMemoryUsers>, config: &Arc<AuthConfig>, email: &str) -> User {
    let raw = RawPassword::new(PASSWORD.to_string()).unwrap();
    let password_hash = UserPassword::from_raw(&raw, config.pepper()).unwrap();
    users
        .create(NewUser {
            email: Email::new(email).unwrap(),
            password_hash,
            role: UserRole::Admin,
            is_active: true,
            first_name: "Anne".to_string(),
            last_name: "Garnier".to_string(),
        })
        .await
        .unwrap()
}

async fn login(
    users: &Arc<InMemoryUsers>,
    config: &Arc<AuthConfig>,
    email: &str,
    remember: bool,
) -> crate::application::LoginOutput {
    LoginUseCase::new(users.clone(), config.clone())
        .execute(LoginInput {
            email: email.to_string(),
            password: PASSWORD.to_string(),
            remember,
        })
        .await
        .unwrap()
}

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_creates_default_visitor_account() {
    let (users, config) = setup();

    let user = register_visitor(&users, &config, "claire@parcs.example.fr").await;

    assert_eq!(user.role, UserRole::User);
    assert!(user.is_active);
    assert!(!user.is_email_verified());
    assert_eq!(user.email.as_str(), "claire@parcs.example.fr");
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let (users, config) = setup();
    register_visitor(&users, &config, "claire@parcs.example.fr").await;

    // Same address, different case and padding: normalization collides
    let result = RegisterUseCase::new(users.clone(), config.clone())
        .execute(RegisterInput {
            email: "  Claire@Parcs.Example.FR ".to_string(),
            password: PASSWORD.to_string(),
            first_name: "Claire".to_string(),
            last_name: "Fontaine".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AuthError::EmailTaken)));
}

#[tokio::test]
async fn test_register_rejects_weak_password() {
    let (users, config) = setup();

    let result = RegisterUseCase::new(users.clone(), config.clone())
        .execute(RegisterInput {
            email: "claire@parcs.example.fr".to_string(),
            password: "alllowercase1".to_string(),
            first_name: "Claire".to_string(),
            last_name: "Fontaine".to_string(),
        })
        .await;

    assert!(matches!(result, Err(AuthError::WeakPassword(_))));
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_returns_valid_token_pair() {
    let (users, config) = setup();
    let user = register_visitor(&users, &config, "claire@parcs.example.fr").await;

    let output = login(&users, &config, "claire@parcs.example.fr", false).await;

    let codec = config.codec();
    let access = codec
        .decode(&output.access_token, TokenType::Access)
        .unwrap();
    let refresh = codec
        .decode(&output.refresh_token, TokenType::Refresh)
        .unwrap();

    assert_eq!(access.user_id(), user.user_id);
    assert_eq!(refresh.user_id(), user.user_id);
    assert!(output.remember_token.is_none());
    assert!(output.user.last_login_at.is_some());
}

#[tokio::test]
async fn test_login_failures_are_uniform() {
    let (users, config) = setup();
    register_visitor(&users, &config, "claire@parcs.example.fr").await;

    let use_case = LoginUseCase::new(users.clone(), config.clone());

    // Wrong password for an existing account
    let wrong_password = use_case
        .execute(LoginInput {
            email: "claire@parcs.example.fr".to_string(),
            password: "WrongPass99".to_string(),
            remember: false,
        })
        .await;

    // Account that does not exist at all
    let unknown_email = use_case
        .execute(LoginInput {
            email: "nobody@parcs.example.fr".to_string(),
            password: PASSWORD.to_string(),
            remember: false,
        })
        .await;

    assert!(matches!(wrong_password, Err(AuthError::InvalidCredentials)));
    assert!(matches!(unknown_email, Err(AuthError::InvalidCredentials)));
}

#[tokio::test]
async fn test_login_rejects_inactive_account() {
    let (users, config) = setup();
    let user = register_visitor(&users, &config, "claire@parcs.example.fr").await;
    users.update_active_status(user.user_id, false).await.unwrap();

    let result = LoginUseCase::new(users.clone(), config.clone())
        .execute(LoginInput {
            email: "claire@parcs.example.fr".to_string(),
            password: PASSWORD.to_string(),
            remember: false,
        })
        .await;

    assert!(matches!(result, Err(AuthError::AccountInactive)));
}

#[tokio::test]
async fn test_login_verification_gate_is_configurable() {
    let (users, _) = setup();
    let config = Arc::new(AuthConfig {
        require_verified_email: true,
        ..AuthConfig::development()
    });

    let user = register_visitor(&users, &config, "claire@parcs.example.fr").await;

    let use_case = LoginUseCase::new(users.clone(), config.clone());
    let gated = use_case
        .execute(LoginInput {
            email: "claire@parcs.example.fr".to_string(),
            password: PASSWORD.to_string(),
            remember: false,
        })
        .await;
    assert!(matches!(gated, Err(AuthError::EmailNotVerified)));

    users.mark_verified(user.user_id);
    assert!(
        use_case
            .execute(LoginInput {
                email: "claire@parcs.example.fr".to_string(),
                password: PASSWORD.to_string(),
                remember: false,
            })
            .await
            .is_ok()
    );
}

// ============================================================================
// Remember me
// ============================================================================

#[tokio::test]
async fn test_remember_login_round_trip() {
    let (users, config) = setup();
    let user = register_visitor(&users, &config, "claire@parcs.example.fr").await;

    let output = login(&users, &config, "claire@parcs.example.fr", true).await;
    let remember_token = output.remember_token.expect("remember token issued");

    let silent = RememberLoginUseCase::new(users.clone(), config.clone())
        .execute(remember_token.as_str())
        .await
        .unwrap()
        .expect("silent re-authentication succeeds");

    assert_eq!(silent.user.user_id, user.user_id);

    // The silent path issues real access tokens
    let claims = config
        .codec()
        .decode(&silent.access_token, TokenType::Access)
        .unwrap();
    assert_eq!(claims.user_id(), user.user_id);
}

#[tokio::test]
async fn test_remember_login_is_silent_on_unknown_token() {
    let (users, config) = setup();
    register_visitor(&users, &config, "claire@parcs.example.fr").await;

    let result = RememberLoginUseCase::new(users.clone(), config.clone())
        .execute("not-a-real-token")
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_remembered_login_rotates_the_token() {
    let (users, config) = setup();
    register_visitor(&users, &config, "claire@parcs.example.fr").await;

    let first = login(&users, &config, "claire@parcs.example.fr", true).await;
    let second = login(&users, &config, "claire@parcs.example.fr", true).await;

    let first_token = first.remember_token.unwrap();
    let second_token = second.remember_token.unwrap();
    assert_ne!(first_token.as_str(), second_token.as_str());

    // Only the latest token still works
    let use_case = RememberLoginUseCase::new(users.clone(), config.clone());
    assert!(use_case.execute(first_token.as_str()).await.unwrap().is_none());
    assert!(use_case.execute(second_token.as_str()).await.unwrap().is_some());
}

#[tokio::test]
async fn test_logout_clears_remember_token() {
    let (users, config) = setup();
    let user = register_visitor(&users, &config, "claire@parcs.example.fr").await;

    let output = login(&users, &config, "claire@parcs.example.fr", true).await;
    let remember_token = output.remember_token.unwrap();

    LogoutUseCase::new(users.clone())
        .execute(user.user_id)
        .await
        .unwrap();

    let silent = RememberLoginUseCase::new(users.clone(), config.clone())
        .execute(remember_token.as_str())
        .await
        .unwrap();
    assert!(silent.is_none());
}

// ============================================================================
// Token refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_rotates_pair_and_access_authenticates() {
    let (users, config) = setup();
    let user = register_visitor(&users, &config, "claire@parcs.example.fr").await;
    let output = login(&users, &config, "claire@parcs.example.fr", false).await;

    let refreshed = RefreshTokenUseCase::new(users.clone(), config.clone())
        .execute(&output.refresh_token)
        .await
        .unwrap();

    let resolved = AuthenticateUseCase::new(users.clone(), config.clone())
        .require_authentication(&refreshed.access_token)
        .await
        .unwrap();
    assert_eq!(resolved.user_id, user.user_id);
}

#[tokio::test]
async fn test_refresh_rejects_access_token() {
    let (users, config) = setup();
    register_visitor(&users, &config, "claire@parcs.example.fr").await;
    let output = login(&users, &config, "claire@parcs.example.fr", false).await;

    let result = RefreshTokenUseCase::new(users.clone(), config.clone())
        .execute(&output.access_token)
        .await;

    assert!(matches!(result, Err(AuthError::Unauthorized)));
}

#[tokio::test]
async fn test_refresh_stops_for_deactivated_account() {
    let (users, config) = setup();
    let user = register_visitor(&users, &config, "claire@parcs.example.fr").await;
    let output = login(&users, &config, "claire@parcs.example.fr", false).await;

    users.update_active_status(user.user_id, false).await.unwrap();

    let result = RefreshTokenUseCase::new(users.clone(), config.clone())
        .execute(&output.refresh_token)
        .await;

    assert!(matches!(result, Err(AuthError::AccountInactive)));
}

// ============================================================================
// Request-time authentication
// ============================================================================

#[tokio::test]
async fn test_require_authentication_rejects_refresh_token() {
    let (users, config) = setup();
    register_visitor(&users, &config, "claire@parcs.example.fr").await;
    let output = login(&users, &config, "claire@parcs.example.fr", false).await;

    let result = AuthenticateUseCase::new(users.clone(), config.clone())
        .require_authentication(&output.refresh_token)
        .await;

    assert!(matches!(result, Err(AuthError::Unauthorized)));
}

#[tokio::test]
async fn test_require_authentication_rejects_garbage() {
    let (users, config) = setup();

    let result = AuthenticateUseCase::new(users.clone(), config.clone())
        .require_authentication("definitely.not.atoken")
        .await;

    assert!(matches!(result, Err(AuthError::Unauthorized)));
}

#[tokio::test]
async fn test_require_role_is_exact_match() {
    let (users, config) = setup();
    register_visitor(&users, &config, "claire@parcs.example.fr").await;
    seed_admin(&users, &config, "admin@parcs.example.fr").await;

    let visitor = login(&users, &config, "claire@parcs.example.fr", false).await;
    let admin = login(&users, &config, "admin@parcs.example.fr", false).await;

    let use_case = AuthenticateUseCase::new(users.clone(), config.clone());

    // Visitor is not admin
    let result = use_case
        .require_role(&visitor.access_token, UserRole::Admin)
        .await;
    assert!(matches!(result, Err(AuthError::Forbidden)));

    // Admin satisfies the admin check
    assert!(
        use_case
            .require_role(&admin.access_token, UserRole::Admin)
            .await
            .is_ok()
    );

    // ...but no hierarchy: an admin token does not pass a User-role check
    let result = use_case
        .require_role(&admin.access_token, UserRole::User)
        .await;
    assert!(matches!(result, Err(AuthError::Forbidden)));
}

// ============================================================================
// Account status
// ============================================================================

#[tokio::test]
async fn test_deactivating_last_admin_is_refused() {
    let (users, config) = setup();
    let admin = seed_admin(&users, &config, "admin@parcs.example.fr").await;

    let use_case = AccountStatusUseCase::new(users.clone());

    let result = use_case.set_active(admin.user_id, false).await;
    assert!(matches!(result, Err(AuthError::LastActiveAdmin)));

    // With a second active admin the same call goes through
    let backup = seed_admin(&users, &config, "backup@parcs.example.fr").await;
    use_case.set_active(admin.user_id, false).await.unwrap();

    assert_eq!(users.count_active_admins().await.unwrap(), 1);

    // Deactivating an ordinary visitor never consults the invariant
    let visitor = register_visitor(&users, &config, "claire@parcs.example.fr").await;
    use_case.set_active(visitor.user_id, false).await.unwrap();

    // And the now-sole admin is again protected
    let result = use_case.set_active(backup.user_id, false).await;
    assert!(matches!(result, Err(AuthError::LastActiveAdmin)));
}

#[tokio::test]
async fn test_deactivation_revokes_remembered_sessions() {
    let (users, config) = setup();
    register_visitor(&users, &config, "claire@parcs.example.fr").await;
    let output = login(&users, &config, "claire@parcs.example.fr", true).await;
    let remember_token = output.remember_token.unwrap();

    AccountStatusUseCase::new(users.clone())
        .set_active(output.user.user_id, false)
        .await
        .unwrap();

    let silent = RememberLoginUseCase::new(users.clone(), config.clone())
        .execute(remember_token.as_str())
        .await
        .unwrap();
    assert!(silent.is_none());
}

#[tokio::test]
async fn test_set_active_unknown_user() {
    let (users, _) = setup();

    let result = AccountStatusUseCase::new(users.clone())
        .set_active(UserId::from_i64(999), false)
        .await;

    assert!(matches!(result, Err(AuthError::UserNotFound)));
}
