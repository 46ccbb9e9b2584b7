//! Domain types for the hotel operations engine.
//!
//! Nothing in this crate performs I/O. Storage lives in `hotelops-db`, event
//! fan-out in `hotelops-events`, and the HTTP surface in `hotelops-api`.

pub mod error;
pub mod notification;
pub mod payment;
pub mod roles;
pub mod service_request;
pub mod status;
pub mod transition;
pub mod types;
