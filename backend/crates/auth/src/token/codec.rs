//! Token Codec
//!
//! Encodes, signs and validates the compact token format:
//! `base64url(header).base64url(payload).base64url(hmac_sha256_signature)`
//! with HS256 over the server secret.
//!
//! Decoding never panics on attacker-controlled input; every failure is a
//! typed [`TokenError`]. Signature comparison is constant-time, and the
//! signature is checked before the payload is parsed.

use platform::crypto;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::token::claims::{Claims, TokenType};

/// Token validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Not three dot-separated base64url parts, or undecodable content
    #[error("token is malformed")]
    Malformed,

    /// Signature does not verify against the server secret
    #[error("token signature is invalid")]
    BadSignature,

    /// Expiry has passed
    #[error("token has expired")]
    Expired,

    /// Valid token of the wrong type for this operation
    #[error("token type is not acceptable here")]
    WrongType,
}

/// A freshly issued access/refresh pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token header: fixed algorithm, declared for interop
#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

impl Default for Header {
    fn default() -> Self {
        Self {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        }
    }
}

/// Stateless codec over the process-wide signing secret
#[derive(Clone)]
pub struct TokenCodec {
    secret: Vec<u8>,
    /// Clock-skew tolerance in seconds when checking expiry (0 = strict)
    leeway_secs: i64,
}

impl TokenCodec {
    pub fn new(secret: impl Into<Vec<u8>>, leeway_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            leeway_secs,
        }
    }

    /// Encode and sign claims into the three-part wire format
    pub fn encode(&self, claims: &Claims) -> String {
        let header =
            serde_json::to_vec(&Header::default()).expect("token header serializes to JSON");
        let payload = serde_json::to_vec(claims).expect("token claims serialize to JSON");

        let signing_input = format!(
            "{}.{}",
            crypto::to_base64url(&header),
            crypto::to_base64url(&payload)
        );
        let signature = crypto::hmac_sha256(&self.secret, signing_input.as_bytes());

        format!("{}.{}", signing_input, crypto::to_base64url(&signature))
    }

    /// Validate a token and return its claims
    ///
    /// Checks, in order: structural shape, signature, expiry, declared
    /// type against `expected`.
    pub fn decode(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        let claims = self.decode_unchecked_type(token)?;

        if claims.token_type != expected {
            return Err(TokenError::WrongType);
        }

        Ok(claims)
    }

    /// Exchange a valid refresh token for a fresh access/refresh pair
    ///
    /// The new tokens carry the same subject with new issue and expiry
    /// times; the old token's remaining lifetime is irrelevant.
    pub fn refresh(
        &self,
        refresh_token: &str,
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
    ) -> Result<TokenPair, TokenError> {
        let claims = self.decode(refresh_token, TokenType::Refresh)?;

        let access = claims.reissue(TokenType::Access, access_ttl_secs);
        let refresh = claims.reissue(TokenType::Refresh, refresh_ttl_secs);

        Ok(TokenPair {
            access_token: self.encode(&access),
            refresh_token: self.encode(&refresh),
        })
    }

    /// Validate structure, signature and expiry; leave the type to callers
    fn decode_unchecked_type(&self, token: &str) -> Result<Claims, TokenError> {
        let mut parts = token.split('.');
        let (header_b64, payload_b64, signature_b64) =
            match (parts.next(), parts.next(), parts.next(), parts.next()) {
                (Some(h), Some(p), Some(s), None) if !h.is_empty() && !p.is_empty() => (h, p, s),
                _ => return Err(TokenError::Malformed),
            };

        let signature = crypto::from_base64url(signature_b64).map_err(|_| TokenError::Malformed)?;

        // Signature first: nothing attacker-controlled is parsed before
        // the MAC verifies
        let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];
        if !crypto::hmac_sha256_verify(&self.secret, signing_input.as_bytes(), &signature) {
            return Err(TokenError::BadSignature);
        }

        let header_json = crypto::from_base64url(header_b64).map_err(|_| TokenError::Malformed)?;
        let header: Header =
            serde_json::from_slice(&header_json).map_err(|_| TokenError::Malformed)?;
        if header.alg != "HS256" {
            return Err(TokenError::Malformed);
        }

        let payload_json =
            crypto::from_base64url(payload_b64).map_err(|_| TokenError::Malformed)?;
        let claims: Claims =
            serde_json::from_slice(&payload_json).map_err(|_| TokenError::Malformed)?;

        let now = chrono::Utc::now().timestamp();
        if now >= claims.exp + self.leeway_secs {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
