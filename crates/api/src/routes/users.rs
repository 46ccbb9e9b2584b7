//! Route definitions for the `/users` resource. Admin only.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET  /             -> list_users
/// POST /             -> create_user
/// PUT  /{id}/status  -> update_account_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route("/{id}/status", put(users::update_account_status))
}
