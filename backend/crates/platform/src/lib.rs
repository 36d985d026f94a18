//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (SHA-256, HMAC-SHA256, base64url)
//! - Password hashing (Argon2id with fixed cost parameters)
//! - Cookie management

pub mod cookie;
pub mod crypto;
pub mod password;
