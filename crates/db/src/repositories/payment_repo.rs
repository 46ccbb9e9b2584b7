//! Repository for the `payments` table.

use hotelops_core::status::PaymentStatus;
use hotelops_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::payment::{CreatePayment, Payment};

const COLUMNS: &str = "id, booking_id, user_id, amount, method, card_last4, status, \
                       completed_at, created_at, updated_at";

/// Provides CRUD operations for payments.
pub struct PaymentRepo;

impl PaymentRepo {
    /// Insert a payment unless the booking already has an open one.
    ///
    /// Guarded by the `uq_payments_open_booking` partial index. Returns
    /// `None` when the index rejected the row.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePayment,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!(
            "INSERT INTO payments
                 (booking_id, user_id, amount, method, card_last4, status, completed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (booking_id)
                 WHERE status IN ('pending', 'completed')
                 DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(input.booking_id)
            .bind(input.user_id)
            .bind(input.amount)
            .bind(input.method.as_str())
            .bind(&input.card_last4)
            .bind(input.status.as_str())
            .bind(input.completed_at)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payments WHERE id = $1");
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List payments, newest first, optionally restricted to one payer.
    pub async fn list(pool: &PgPool, user_id: Option<DbId>) -> Result<Vec<Payment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payments
             WHERE ($1::BIGINT IS NULL OR user_id = $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: PaymentStatus,
        completed_at: Option<Timestamp>,
    ) -> Result<Option<Payment>, sqlx::Error> {
        let query = format!(
            "UPDATE payments SET status = $2, completed_at = COALESCE($3, completed_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Payment>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(completed_at)
            .fetch_optional(pool)
            .await
    }
}
