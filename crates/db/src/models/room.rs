//! Room model and DTOs.

use hotelops_core::status::RoomStatus;
use hotelops_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `rooms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Room {
    pub id: DbId,
    pub room_number: String,
    pub room_type: String,
    pub price_per_night: f64,
    pub floor: i32,
    #[sqlx(try_from = "String")]
    pub status: RoomStatus,
    pub is_available: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a room. New rooms start `available`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoom {
    pub room_number: String,
    pub room_type: String,
    pub price_per_night: f64,
    #[serde(default)]
    pub floor: i32,
}
