//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.
//!
//! Two contracts live here:
//! - unknown email and wrong password surface as the same
//!   `InvalidCredentials` value, so responses cannot be used to enumerate
//!   accounts
//! - expired and malformed tokens stay distinguishable (both 401), so
//!   clients know when a refresh is worth attempting

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::token::codec::TokenError;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// User not found
    #[error("User not found")]
    UserNotFound,

    /// Email already registered
    #[error("Email address is already registered")]
    EmailTaken,

    /// Invalid credentials (unknown email or wrong password, uniformly)
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Account is deactivated
    #[error("Account is inactive")]
    AccountInactive,

    /// Email address has not been confirmed yet
    #[error("Email address is not verified")]
    EmailNotVerified,

    /// Password fails the account policy
    #[error("Password is too weak: {0}")]
    WeakPassword(String),

    /// Request input failed validation
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Missing, malformed or unverifiable token
    #[error("Authentication required")]
    Unauthorized,

    /// Token was valid once but has expired
    #[error("Token has expired")]
    TokenExpired,

    /// Valid identity, insufficient privilege
    #[error("Insufficient privileges")]
    Forbidden,

    /// Deactivating would remove the last active admin
    #[error("Cannot deactivate the last active admin")]
    LastActiveAdmin,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::UserNotFound => StatusCode::NOT_FOUND,
            AuthError::EmailTaken | AuthError::LastActiveAdmin => StatusCode::CONFLICT,
            AuthError::InvalidCredentials | AuthError::Unauthorized | AuthError::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::AccountInactive
            | AuthError::EmailNotVerified
            | AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::WeakPassword(_) | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::Database(_) | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::EmailTaken | AuthError::LastActiveAdmin => ErrorKind::Conflict,
            AuthError::InvalidCredentials | AuthError::Unauthorized | AuthError::TokenExpired => {
                ErrorKind::Unauthorized
            }
            AuthError::AccountInactive
            | AuthError::EmailNotVerified
            | AuthError::Forbidden => ErrorKind::Forbidden,
            AuthError::WeakPassword(_) | AuthError::Validation(_) => ErrorKind::BadRequest,
            AuthError::Database(_) | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        AppError::new(self.kind(), self.to_string())
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::LastActiveAdmin => {
                tracing::warn!("Refused to deactivate the last active admin");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => AuthError::Validation(err.message().to_string()),
            _ => AuthError::Internal(err.to_string()),
        }
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AuthError::TokenExpired,
            // Malformed, bad signature and wrong type all collapse into
            // a generic 401: nothing secret-related may leak
            TokenError::Malformed | TokenError::BadSignature | TokenError::WrongType => {
                AuthError::Unauthorized
            }
        }
    }
}

impl From<platform::password::PasswordHashError> for AuthError {
    fn from(err: platform::password::PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AuthError::UserNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AuthError::EmailTaken.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            AuthError::InvalidCredentials.status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AuthError::AccountInactive.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AuthError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthError::WeakPassword("short".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AuthError::LastActiveAdmin.status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_token_error_mapping() {
        assert!(matches!(
            AuthError::from(TokenError::Expired),
            AuthError::TokenExpired
        ));
        assert!(matches!(
            AuthError::from(TokenError::BadSignature),
            AuthError::Unauthorized
        ));
        assert!(matches!(
            AuthError::from(TokenError::Malformed),
            AuthError::Unauthorized
        ));
        assert!(matches!(
            AuthError::from(TokenError::WrongType),
            AuthError::Unauthorized
        ));
    }

    #[test]
    fn test_message_does_not_distinguish_credential_failures() {
        // One message for both unknown-email and wrong-password paths
        assert_eq!(AuthError::InvalidCredentials.to_string(), "Invalid credentials");
    }
}
