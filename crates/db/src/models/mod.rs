//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO consumed by the stores

pub mod booking;
pub mod notification;
pub mod payment;
pub mod room;
pub mod service_request;
pub mod user;
