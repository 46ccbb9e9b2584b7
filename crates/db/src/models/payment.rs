//! Payment model and DTOs.

use hotelops_core::payment::PaymentMethod;
use hotelops_core::status::PaymentStatus;
use hotelops_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `payments` table. Only the card's last four digits are kept.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Payment {
    pub id: DbId,
    pub booking_id: DbId,
    pub user_id: DbId,
    pub amount: f64,
    #[sqlx(try_from = "String")]
    pub method: PaymentMethod,
    pub card_last4: Option<String>,
    #[sqlx(try_from = "String")]
    pub status: PaymentStatus,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a payment.
#[derive(Debug, Clone)]
pub struct CreatePayment {
    pub booking_id: DbId,
    pub user_id: DbId,
    pub amount: f64,
    pub method: PaymentMethod,
    pub card_last4: Option<String>,
    pub status: PaymentStatus,
    pub completed_at: Option<Timestamp>,
}

/// Statuses that count against the one-open-payment-per-booking rule.
pub const OPEN_PAYMENT_STATUSES: [PaymentStatus; 2] =
    [PaymentStatus::Pending, PaymentStatus::Completed];
