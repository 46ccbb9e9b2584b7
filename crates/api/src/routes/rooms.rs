//! Route definitions for the `/rooms` resource.

use axum::routing::{delete, get, put};
use axum::Router;

use crate::handlers::rooms;
use crate::state::AppState;

/// Routes mounted at `/rooms`.
///
/// ```text
/// GET    /             -> list_rooms
/// POST   /             -> create_room
/// DELETE /{id}         -> delete_room
/// PUT    /{id}/status  -> update_room_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(rooms::list_rooms).post(rooms::create_room))
        .route("/{id}", delete(rooms::delete_room))
        .route("/{id}/status", put(rooms::update_room_status))
}
