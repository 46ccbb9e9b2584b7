//! Route definitions for the `/bookings` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::bookings;
use crate::state::AppState;

/// Routes mounted at `/bookings`.
///
/// ```text
/// GET  /             -> list_bookings
/// POST /             -> create_booking
/// PUT  /{id}/status  -> update_booking_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/{id}/status", put(bookings::update_booking_status))
}
