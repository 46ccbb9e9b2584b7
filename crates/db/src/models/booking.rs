//! Booking model and DTOs.

use chrono::NaiveDate;
use hotelops_core::status::BookingStatus;
use hotelops_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `bookings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Booking {
    pub id: DbId,
    pub guest_id: DbId,
    pub room_id: DbId,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub total_amount: f64,
    #[sqlx(try_from = "String")]
    pub status: BookingStatus,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a booking. New bookings start `pending`.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub guest_id: DbId,
    pub room_id: DbId,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub total_amount: f64,
}

/// Statuses that hold a room; at most one such booking per (guest, room).
pub const ACTIVE_BOOKING_STATUSES: [BookingStatus; 3] = [
    BookingStatus::Pending,
    BookingStatus::Confirmed,
    BookingStatus::CheckedIn,
];
