//! Auth (Authentication & Authorization) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository trait
//! - `token/` - Claims, wire format and HS256 signing
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, access guard
//!
//! ## Features
//! - Visitor registration and login with email + password
//! - Stateless access/refresh tokens (HS256 JWT)
//! - "Remember me" persistent login via an opaque server-side token
//! - Role-based access (User, Admin) with an explicit capability table
//!
//! ## Security Model
//! - Passwords hashed with Argon2id (64 MiB, t=4, p=3)
//! - Uniform credential failures (no account enumeration)
//! - Token signatures compared in constant time
//! - Refresh tokens are never accepted where access tokens are required

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;
pub mod token;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgUserRepository;
pub use presentation::router::auth_router;
pub use token::{TokenCodec, TokenError};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

// Convenience re-exports
pub mod config {
    pub use crate::application::config::*;
}

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod handlers {
    pub use crate::presentation::handlers::*;
}

pub mod store {
    pub use crate::infra::postgres::PgUserRepository as UserStore;
}

pub mod router {
    pub use crate::presentation::router::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}
