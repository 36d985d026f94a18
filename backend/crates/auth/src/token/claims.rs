//! Token Claims
//!
//! The payload carried by signed tokens. Role and email ride along so a
//! request can be classified without a store round-trip; the store is
//! still consulted for anything security-relevant (active flag).

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::value_object::{email::Email, user_id::UserId, user_role::UserRole};

/// Token purpose
///
/// A token is only accepted by operations expecting its declared type:
/// a refresh token is never a substitute for an access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed token payload
///
/// Timestamps are integer seconds since the Unix epoch, UTC.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id
    pub sub: i64,
    /// Email at issue time
    pub email: String,
    /// Role at issue time
    pub role: UserRole,
    /// Issued at
    pub iat: i64,
    /// Expires at
    pub exp: i64,
    /// Token purpose
    #[serde(rename = "type")]
    pub token_type: TokenType,
}

impl Claims {
    /// Build claims for a subject, expiring `ttl_secs` from now
    pub fn new(
        user_id: UserId,
        email: &Email,
        role: UserRole,
        token_type: TokenType,
        ttl_secs: i64,
    ) -> Self {
        let iat = Utc::now().timestamp();
        Self {
            sub: user_id.as_i64(),
            email: email.as_str().to_string(),
            role,
            iat,
            exp: iat + ttl_secs,
            token_type,
        }
    }

    /// Subject as a typed id
    pub fn user_id(&self) -> UserId {
        UserId::from_i64(self.sub)
    }

    /// Derive a fresh set of claims for the same subject
    ///
    /// Used by token refresh: same identity, new issue and expiry times,
    /// possibly a different purpose. The old expiry is never carried over.
    pub fn reissue(&self, token_type: TokenType, ttl_secs: i64) -> Self {
        let iat = Utc::now().timestamp();
        Self {
            sub: self.sub,
            email: self.email.clone(),
            role: self.role,
            iat,
            exp: iat + ttl_secs,
            token_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_ttl() {
        let email = Email::new("visitor@example.com").unwrap();
        let claims = Claims::new(UserId::from_i64(7), &email, UserRole::User, TokenType::Access, 900);

        assert_eq!(claims.sub, 7);
        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.user_id().as_i64(), 7);
    }

    #[test]
    fn test_reissue_does_not_reuse_expiry() {
        let email = Email::new("visitor@example.com").unwrap();
        let original = Claims::new(
            UserId::from_i64(7),
            &email,
            UserRole::User,
            TokenType::Refresh,
            60,
        );

        let reissued = original.reissue(TokenType::Access, 900);
        assert_eq!(reissued.sub, original.sub);
        assert_eq!(reissued.email, original.email);
        assert_eq!(reissued.token_type, TokenType::Access);
        assert_eq!(reissued.exp - reissued.iat, 900);
    }

    #[test]
    fn test_wire_format_field_names() {
        let email = Email::new("visitor@example.com").unwrap();
        let claims = Claims::new(UserId::from_i64(1), &email, UserRole::Admin, TokenType::Refresh, 10);

        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["type"], "refresh");
        assert_eq!(json["role"], "admin");
        assert_eq!(json["sub"], 1);
    }
}
