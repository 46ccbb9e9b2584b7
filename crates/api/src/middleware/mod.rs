//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- verified, live identity from a Bearer token.
//! - [`rbac::RequireAdmin`] -- requires the `admin` role.
//! - [`rbac::RequireManager`] -- requires `admin` or `manager`.

pub mod auth;
pub mod rbac;
