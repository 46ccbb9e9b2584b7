//! Authentication primitives.
//!
//! - [`password`] -- Argon2id password hashing and verification.
//! - [`jwt`] -- session token issuing and verification.
//! - [`bootstrap`] -- first admin account at startup.

pub mod bootstrap;
pub mod jwt;
pub mod password;
