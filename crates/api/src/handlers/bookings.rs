//! Handlers for the `/bookings` resource.
//!
//! Creating a booking takes the room (`booked`, unavailable); checking out
//! sends it to `cleaning` and cancelling releases it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use hotelops_core::error::CoreError;
use hotelops_core::roles::{Permission, Role};
use hotelops_core::status::{BookingStatus, RoomStatus};
use hotelops_core::transition::check_transition;
use hotelops_core::types::DbId;
use hotelops_db::models::booking::{Booking, CreateBooking, ACTIVE_BOOKING_STATUSES};
use hotelops_db::store::UQ_ACTIVE_BOOKING;
use hotelops_events::DomainEvent;
use serde::Deserialize;

use crate::error::AppResult;
use crate::handlers::rooms::{cascade_room_status, find_room};
use crate::handlers::{completion_stamp, StatusUpdateRequest};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /bookings`.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub room_id: DbId,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    /// Required when staff book on a guest's behalf; ignored for guests.
    pub guest_id: Option<DbId>,
}

/// GET /api/v1/bookings
///
/// Guests see only their own bookings.
pub async fn list_bookings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Booking>>>> {
    let owner = auth.is_guest().then_some(auth.user_id);
    let bookings = state.stores.bookings.list_bookings(owner).await?;
    Ok(Json(DataResponse::new(bookings)))
}

/// POST /api/v1/bookings
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Booking>>)> {
    auth.require_permission(&state, Permission::MakeBookings)?;

    let guest_id = if auth.is_guest() {
        auth.user_id
    } else {
        let guest_id = input
            .guest_id
            .ok_or_else(|| CoreError::Validation("guest_id is required".into()))?;
        let guest = state
            .stores
            .users
            .find_user(guest_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: guest_id,
            })?;
        if guest.role != Role::Guest {
            return Err(CoreError::Validation(format!("User {guest_id} is not a guest")).into());
        }
        guest_id
    };

    let nights = (input.check_out_date - input.check_in_date).num_days();
    if nights <= 0 {
        return Err(
            CoreError::Validation("check_out_date must be after check_in_date".into()).into(),
        );
    }

    let room = find_room(&state, input.room_id).await?;
    if room.status != RoomStatus::Available || !room.is_available {
        // A repeat of the guest's own booking is a duplicate, not a clash.
        let already_held = state
            .stores
            .bookings
            .list_bookings(Some(guest_id))
            .await?
            .iter()
            .any(|b| b.room_id == room.id && ACTIVE_BOOKING_STATUSES.contains(&b.status));
        if already_held {
            return Err(CoreError::DuplicateEntity(UQ_ACTIVE_BOOKING.to_string()).into());
        }
        return Err(
            CoreError::Conflict(format!("Room {} is not available", room.room_number)).into(),
        );
    }

    let booking = state
        .stores
        .bookings
        .create_booking(&CreateBooking {
            guest_id,
            room_id: room.id,
            check_in_date: input.check_in_date,
            check_out_date: input.check_out_date,
            total_amount: nights as f64 * room.price_per_night,
        })
        .await?;

    tracing::info!(
        user_id = auth.user_id,
        booking_id = booking.id,
        room_id = room.id,
        guest_id,
        "Booking created"
    );
    state.events.publish(DomainEvent::BookingCreated {
        booking_id: booking.id,
        guest_id,
        room_number: room.room_number.clone(),
    });
    cascade_room_status(&state, room.id, RoomStatus::Booked, false).await;

    Ok((StatusCode::CREATED, Json(DataResponse::new(booking))))
}

/// PUT /api/v1/bookings/{id}/status
///
/// Needs `manage_bookings`, except that a guest may cancel their own booking.
/// Guests get 403 for any booking that is not theirs, existing or not.
pub async fn update_booking_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdateRequest>,
) -> AppResult<Json<DataResponse<Booking>>> {
    if !auth.is_guest() {
        auth.require_permission(&state, Permission::ManageBookings)?;
    }

    let booking = state.stores.bookings.find_booking(id).await?;
    let booking = match (booking, auth.is_guest()) {
        (Some(b), false) => b,
        (Some(b), true) if b.guest_id == auth.user_id => b,
        (_, true) => {
            return Err(CoreError::Forbidden("Cannot modify another guest's booking".into()).into())
        }
        (None, false) => {
            return Err(CoreError::NotFound {
                entity: "Booking",
                id,
            }
            .into())
        }
    };

    let next: BookingStatus = input.status.trim().parse()?;
    if auth.is_guest() && next != BookingStatus::Cancelled {
        auth.require_permission(&state, Permission::ManageBookings)?;
    }

    let outcome = check_transition(
        booking.id,
        booking.status,
        next,
        false,
        state.transition_policy(),
    )?;

    let updated = state
        .stores
        .bookings
        .update_booking_status(booking.id, next, completion_stamp(next))
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Booking",
            id,
        })?;

    tracing::info!(
        user_id = auth.user_id,
        booking_id = id,
        from = %booking.status,
        to = %next,
        "Booking status updated"
    );
    if let Some(transition) = outcome.accepted() {
        state.events.publish(DomainEvent::BookingTransition {
            guest_id: booking.guest_id,
            transition: *transition,
        });
    }

    match next {
        BookingStatus::CheckedOut => {
            cascade_room_status(&state, booking.room_id, RoomStatus::Cleaning, false).await
        }
        BookingStatus::Cancelled => {
            cascade_room_status(&state, booking.room_id, RoomStatus::Available, true).await
        }
        BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::CheckedIn => {}
    }

    Ok(Json(DataResponse::new(updated)))
}
