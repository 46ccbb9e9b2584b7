use axum::routing::{get, put};
use axum::Router;

use crate::handlers::payments;
use crate::state::AppState;

/// Routes mounted at `/payments`.
///
/// ```text
/// GET  /             -> list_payments
/// POST /             -> create_payment
/// PUT  /{id}/status  -> update_payment_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(payments::list_payments).post(payments::create_payment),
        )
        .route("/{id}/status", put(payments::update_payment_status))
}
