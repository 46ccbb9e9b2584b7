//! Handlers for the `/payments` resource.
//!
//! There is no gateway. Card payments pass digit checks and settle
//! immediately; cash payments start `pending` until staff complete them.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use hotelops_core::error::CoreError;
use hotelops_core::payment::{
    card_last4, validate_card_number, validate_cvv, validate_expiry, PaymentMethod,
};
use hotelops_core::roles::Role;
use hotelops_core::status::PaymentStatus;
use hotelops_core::transition::check_transition;
use hotelops_core::types::DbId;
use hotelops_db::models::payment::{CreatePayment, Payment};
use hotelops_events::DomainEvent;
use serde::Deserialize;
use validator::ValidationError;

use crate::error::AppResult;
use crate::handlers::{completion_stamp, StatusUpdateRequest};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Roles allowed to record a payment.
pub const PAYMENT_CREATE_ROLES: &[Role] =
    &[Role::Guest, Role::Receptionist, Role::Manager, Role::Admin];

/// Roles allowed to change a payment's status.
pub const PAYMENT_STATUS_ROLES: &[Role] = &[Role::Admin, Role::Manager, Role::Receptionist];

/// Request body for `POST /payments`. Card fields are required for `card`.
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    pub booking_id: DbId,
    pub method: PaymentMethod,
    /// Defaults to the booking total.
    pub amount: Option<f64>,
    pub card_number: Option<String>,
    pub cvv: Option<String>,
    pub expiry: Option<String>,
}

/// GET /api/v1/payments
///
/// Guests see only their own payments.
pub async fn list_payments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Payment>>>> {
    let owner = auth.is_guest().then_some(auth.user_id);
    let payments = state.stores.payments.list_payments(owner).await?;
    Ok(Json(DataResponse::new(payments)))
}

/// POST /api/v1/payments
pub async fn create_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreatePaymentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Payment>>)> {
    auth.require_role(PAYMENT_CREATE_ROLES)?;

    let booking = state
        .stores
        .bookings
        .find_booking(input.booking_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Booking",
            id: input.booking_id,
        })?;
    if auth.is_guest() && booking.guest_id != auth.user_id {
        return Err(CoreError::Forbidden("Cannot pay for another guest's booking".into()).into());
    }

    let amount = input.amount.unwrap_or(booking.total_amount);
    if amount <= 0.0 || !amount.is_finite() {
        return Err(CoreError::Validation("amount must be positive".into()).into());
    }

    let (card_last4, status, completed_at) = match input.method {
        PaymentMethod::Card => {
            let number = check_card(&input)?;
            (
                Some(card_last4(number)),
                PaymentStatus::Completed,
                Some(Utc::now()),
            )
        }
        PaymentMethod::Cash => (None, PaymentStatus::Pending, None),
    };

    let payment = state
        .stores
        .payments
        .create_payment(&CreatePayment {
            booking_id: booking.id,
            user_id: booking.guest_id,
            amount,
            method: input.method,
            card_last4,
            status,
            completed_at,
        })
        .await?;

    tracing::info!(
        user_id = auth.user_id,
        payment_id = payment.id,
        booking_id = booking.id,
        method = %payment.method,
        status = %payment.status,
        "Payment recorded"
    );
    state.events.publish(DomainEvent::PaymentCreated {
        payment_id: payment.id,
        booking_id: booking.id,
        user_id: payment.user_id,
        amount: payment.amount,
        status: payment.status,
    });

    Ok((StatusCode::CREATED, Json(DataResponse::new(payment))))
}

/// PUT /api/v1/payments/{id}/status
pub async fn update_payment_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdateRequest>,
) -> AppResult<Json<DataResponse<Payment>>> {
    auth.require_role(PAYMENT_STATUS_ROLES)?;

    let payment = state
        .stores
        .payments
        .find_payment(id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Payment",
            id,
        })?;

    let next: PaymentStatus = input.status.trim().parse()?;
    let outcome = check_transition(
        payment.id,
        payment.status,
        next,
        false,
        state.transition_policy(),
    )?;

    let updated = state
        .stores
        .payments
        .update_payment_status(payment.id, next, completion_stamp(next))
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Payment",
            id,
        })?;

    tracing::info!(
        user_id = auth.user_id,
        payment_id = id,
        from = %payment.status,
        to = %next,
        "Payment status updated"
    );
    if let Some(transition) = outcome.accepted() {
        state.events.publish(DomainEvent::PaymentTransition {
            user_id: payment.user_id,
            transition: *transition,
        });
    }

    Ok(Json(DataResponse::new(updated)))
}

/// Validate the card fields and return the card number.
fn check_card(input: &CreatePaymentRequest) -> Result<&str, CoreError> {
    let number = card_field(&input.card_number, "card_number", validate_card_number)?;
    card_field(&input.cvv, "cvv", validate_cvv)?;
    card_field(&input.expiry, "expiry", validate_expiry)?;
    Ok(number)
}

fn card_field<'a>(
    value: &'a Option<String>,
    name: &str,
    check: fn(&str) -> Result<(), ValidationError>,
) -> Result<&'a str, CoreError> {
    let value = value
        .as_deref()
        .ok_or_else(|| CoreError::Validation(format!("{name} is required for card payments")))?;
    check(value).map_err(|_| CoreError::Validation(format!("{name} is invalid")))?;
    Ok(value)
}
