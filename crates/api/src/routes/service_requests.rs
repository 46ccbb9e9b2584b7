//! Route definitions for the `/service-requests` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::service_requests;
use crate::state::AppState;

/// Routes mounted at `/service-requests`.
///
/// ```text
/// GET  /             -> list_service_requests
/// POST /             -> create_service_request
/// PUT  /{id}/status  -> update_service_request_status
/// PUT  /{id}/assign  -> assign_service_request (admin, manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(service_requests::list_service_requests)
                .post(service_requests::create_service_request),
        )
        .route(
            "/{id}/status",
            put(service_requests::update_service_request_status),
        )
        .route(
            "/{id}/assign",
            put(service_requests::assign_service_request),
        )
}
