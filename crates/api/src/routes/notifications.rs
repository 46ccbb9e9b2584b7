//! Route definitions for the `/notifications` resource.
//!
//! All endpoints require authentication.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /              -> list_notifications
/// GET    /unread-count  -> unread_count
/// PUT    /read-all      -> mark_all_read
/// PUT    /{id}/read     -> mark_read
/// DELETE /{id}          -> delete_notification (admin, manager)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list_notifications))
        .route("/unread-count", get(notifications::unread_count))
        .route("/read-all", put(notifications::mark_all_read))
        .route("/{id}/read", put(notifications::mark_read))
        .route("/{id}", delete(notifications::delete_notification))
}
