//! Remember Token Value Object
//!
//! Opaque persistent-login secret. Stored server-side on the user row and
//! mirrored in an HttpOnly client cookie. Distinct from the signed JWTs:
//! it carries no claims and is only ever compared against the store.

use platform::crypto;
use std::fmt;

/// Number of random bytes in a remember token
const TOKEN_BYTES: usize = 32;

/// Opaque persistent-login token
///
/// Rotated on every remembered login, cleared on logout.
#[derive(Clone, PartialEq, Eq)]
pub struct RememberToken(String);

impl RememberToken {
    /// Generate a fresh token from CSPRNG bytes
    pub fn generate() -> Self {
        Self(crypto::to_base64url(&crypto::random_bytes(TOKEN_BYTES)))
    }

    /// Create from database value
    pub fn from_db(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Get the token string for storage or cookie transport
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Constant-time comparison against a client-supplied value
    pub fn matches(&self, candidate: &str) -> bool {
        crypto::constant_time_eq(self.0.as_bytes(), candidate.as_bytes())
    }
}

impl fmt::Debug for RememberToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RememberToken").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_unique() {
        let a = RememberToken::generate();
        let b = RememberToken::generate();
        assert_ne!(a.as_str(), b.as_str());
        // 32 bytes -> 43 base64url chars, no padding
        assert_eq!(a.as_str().len(), 43);
        assert!(!a.as_str().contains('='));
    }

    #[test]
    fn test_matches() {
        let token = RememberToken::generate();
        assert!(token.matches(token.as_str()));
        assert!(!token.matches("something-else"));
    }

    #[test]
    fn test_debug_redaction() {
        let token = RememberToken::generate();
        let debug = format!("{:?}", token);
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains(token.as_str()));
    }
}
