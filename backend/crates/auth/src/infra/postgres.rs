//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    email::Email, remember_token::RememberToken, user_id::UserId, user_password::UserPassword,
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = r#"
    id,
    email,
    password_hash,
    user_role,
    is_active,
    email_verified_at,
    first_name,
    last_name,
    remember_token,
    last_login_at,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed user repository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Row mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    user_role: i16,
    is_active: bool,
    email_verified_at: Option<DateTime<Utc>>,
    first_name: String,
    last_name: String,
    remember_token: Option<String>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let role = UserRole::from_id(self.user_role)
            .ok_or_else(|| AuthError::Internal(format!("Invalid role id in row: {}", self.user_role)))?;

        let password_hash = UserPassword::from_phc_string(self.password_hash)?;

        Ok(User {
            user_id: UserId::from_i64(self.id),
            email: Email::from_db(self.email),
            password_hash,
            role,
            is_active: self.is_active,
            email_verified_at: self.email_verified_at,
            first_name: self.first_name,
            last_name: self.last_name,
            remember_token: self.remember_token.map(RememberToken::from_db),
            last_login_at: self.last_login_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> AuthResult<User> {
        let now = Utc::now();

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (
                email,
                password_hash,
                user_role,
                is_active,
                first_name,
                last_name,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(new_user.email.into_db())
        .bind(new_user.password_hash.as_phc_string())
        .bind(new_user.role.id())
        .bind(new_user.is_active)
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Unique violation on email: the race the pre-check cannot close
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23505") {
                    return AuthError::EmailTaken;
                }
            }
            AuthError::Database(e)
        })?;

        row.into_user()
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_remember_token(&self, token: &str) -> AuthResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE remember_token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn update_active_status(&self, user_id: UserId, active: bool) -> AuthResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET is_active = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(user_id.as_i64())
        .bind(active)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_remember_token(
        &self,
        user_id: UserId,
        token: Option<&RememberToken>,
    ) -> AuthResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET remember_token = $2, updated_at = $3 WHERE id = $1",
        )
        .bind(user_id.as_i64())
        .bind(token.map(|t| t.as_str()))
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_login(&self, user_id: UserId) -> AuthResult<()> {
        sqlx::query(
            "UPDATE users SET last_login_at = $2, updated_at = $2 WHERE id = $1",
        )
        .bind(user_id.as_i64())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn count_active_admins(&self) -> AuthResult<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE user_role = $1 AND is_active",
        )
        .bind(UserRole::Admin.id())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}
