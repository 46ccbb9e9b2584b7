//! Repository for the `service_requests` table.

use hotelops_core::status::ServiceRequestStatus;
use hotelops_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::service_request::{CreateServiceRequest, ServiceRequest};

const COLUMNS: &str = "id, reported_by, room_id, request_type, description, status, \
                       assigned_to, completed_at, created_at, updated_at";

/// Provides CRUD operations for service requests.
pub struct ServiceRequestRepo;

impl ServiceRequestRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateServiceRequest,
    ) -> Result<ServiceRequest, sqlx::Error> {
        let query = format!(
            "INSERT INTO service_requests (reported_by, room_id, request_type, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(input.reported_by)
            .bind(input.room_id)
            .bind(input.request_type.as_str())
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ServiceRequest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM service_requests WHERE id = $1");
        sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List requests, newest first, optionally restricted to one reporter.
    pub async fn list(
        pool: &PgPool,
        reported_by: Option<DbId>,
    ) -> Result<Vec<ServiceRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM service_requests
             WHERE ($1::BIGINT IS NULL OR reported_by = $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(reported_by)
            .fetch_all(pool)
            .await
    }

    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: ServiceRequestStatus,
        completed_at: Option<Timestamp>,
    ) -> Result<Option<ServiceRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE service_requests SET status = $2, completed_at = COALESCE($3, completed_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(completed_at)
            .fetch_optional(pool)
            .await
    }

    /// Set the assignee and status in one write.
    pub async fn assign(
        pool: &PgPool,
        id: DbId,
        assignee_id: DbId,
        status: ServiceRequestStatus,
    ) -> Result<Option<ServiceRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE service_requests SET assigned_to = $2, status = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ServiceRequest>(&query)
            .bind(id)
            .bind(assignee_id)
            .bind(status.as_str())
            .fetch_optional(pool)
            .await
    }
}
