//! Repository for the `bookings` table.

use hotelops_core::status::BookingStatus;
use hotelops_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::booking::{Booking, CreateBooking};

const COLUMNS: &str = "id, guest_id, room_id, check_in_date, check_out_date, total_amount, \
                       status, completed_at, created_at, updated_at";

/// Provides CRUD operations for bookings.
pub struct BookingRepo;

impl BookingRepo {
    /// Insert a booking unless the guest already holds an active booking for
    /// the same room.
    ///
    /// The check is enforced by the `uq_bookings_active_guest_room` partial
    /// index, so concurrent inserts cannot both succeed. Returns `None` when
    /// the index rejected the row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateBooking,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "INSERT INTO bookings (guest_id, room_id, check_in_date, check_out_date, total_amount)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (guest_id, room_id)
                 WHERE status IN ('pending', 'confirmed', 'checked_in')
                 DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(input.guest_id)
            .bind(input.room_id)
            .bind(input.check_in_date)
            .bind(input.check_out_date)
            .bind(input.total_amount)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bookings WHERE id = $1");
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List bookings, newest first, optionally restricted to one guest.
    pub async fn list(pool: &PgPool, guest_id: Option<DbId>) -> Result<Vec<Booking>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM bookings
             WHERE ($1::BIGINT IS NULL OR guest_id = $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(guest_id)
            .fetch_all(pool)
            .await
    }

    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: BookingStatus,
        completed_at: Option<Timestamp>,
    ) -> Result<Option<Booking>, sqlx::Error> {
        let query = format!(
            "UPDATE bookings SET status = $2, completed_at = COALESCE($3, completed_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Booking>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(completed_at)
            .fetch_optional(pool)
            .await
    }
}
