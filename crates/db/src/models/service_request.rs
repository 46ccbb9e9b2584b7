//! Service request model and DTOs.

use hotelops_core::service_request::ServiceRequestType;
use hotelops_core::status::ServiceRequestStatus;
use hotelops_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `service_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ServiceRequest {
    pub id: DbId,
    pub reported_by: DbId,
    pub room_id: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub request_type: ServiceRequestType,
    pub description: String,
    #[sqlx(try_from = "String")]
    pub status: ServiceRequestStatus,
    pub assigned_to: Option<DbId>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for opening a request. New requests start `pending`.
#[derive(Debug, Clone)]
pub struct CreateServiceRequest {
    pub reported_by: DbId,
    pub room_id: Option<DbId>,
    pub request_type: ServiceRequestType,
    pub description: String,
}
