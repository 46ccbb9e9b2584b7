//! Request handlers, one module per resource.

pub mod auth;
pub mod bookings;
pub mod notifications;
pub mod payments;
pub mod rooms;
pub mod service_requests;
pub mod users;

use chrono::Utc;
use hotelops_core::status::EntityStatus;
use hotelops_core::types::Timestamp;
use serde::Deserialize;

/// Request body shared by the `PUT /{entity}/{id}/status` endpoints.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// `completed_at` to persist alongside a new status: stamped on terminal
/// targets, otherwise left as stored.
pub(crate) fn completion_stamp<S: EntityStatus>(to: S) -> Option<Timestamp> {
    to.is_terminal().then(Utc::now)
}
