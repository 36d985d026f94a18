//! Application Configuration
//!
//! Configuration for the auth application layer. Built once at process
//! start and shared behind an `Arc`; there is no other process-wide
//! mutable state.

use std::time::Duration;

use crate::token::TokenCodec;

/// Re-export SameSite from platform
pub use platform::cookie::SameSite;

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 signing secret for tokens
    pub token_secret: Vec<u8>,
    /// Access token lifetime (15 minutes)
    pub access_ttl: Duration,
    /// Refresh token lifetime (14 days)
    pub refresh_ttl: Duration,
    /// Clock-skew tolerance when checking token expiry (strict by default)
    pub clock_skew_leeway_secs: i64,
    /// Remember-me cookie name
    pub remember_cookie_name: String,
    /// Remember-me cookie lifetime (30 days)
    pub remember_ttl: Duration,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    /// SameSite policy
    pub cookie_same_site: SameSite,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    /// Whether an unverified email blocks login
    pub require_verified_email: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_secret: Vec::new(),
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(14 * 24 * 3600),
            clock_skew_leeway_secs: 0,
            remember_cookie_name: "remember_token".to_string(),
            remember_ttl: Duration::from_secs(30 * 24 * 3600),
            cookie_secure: true,
            cookie_same_site: SameSite::Lax,
            password_pepper: None,
            require_verified_email: false,
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            token_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Build the codec for this configuration
    pub fn codec(&self) -> TokenCodec {
        TokenCodec::new(self.token_secret.clone(), self.clock_skew_leeway_secs)
    }

    /// Access token TTL in whole seconds
    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl.as_secs() as i64
    }

    /// Refresh token TTL in whole seconds
    pub fn refresh_ttl_secs(&self) -> i64 {
        self.refresh_ttl.as_secs() as i64
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}
