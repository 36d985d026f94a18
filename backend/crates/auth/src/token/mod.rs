//! Token Module
//!
//! Claims, wire format and HS256 signing for access/refresh tokens.

pub mod claims;
pub mod codec;

// Re-exports
pub use claims::{Claims, TokenType};
pub use codec::{TokenCodec, TokenError, TokenPair};
