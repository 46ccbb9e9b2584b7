pub mod auth;
pub mod bookings;
pub mod health;
pub mod notifications;
pub mod payments;
pub mod rooms;
pub mod service_requests;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                          register guest (public)
/// /auth/login                             login (public)
/// /auth/profile                           own profile
///
/// /users                                  list, create (admin)
/// /users/{id}/status                      set account status (admin)
///
/// /rooms                                  list, create
/// /rooms/{id}                             hard delete (admin)
/// /rooms/{id}/status                      transition
///
/// /bookings                               list, create
/// /bookings/{id}/status                   transition
///
/// /payments                               list, create
/// /payments/{id}/status                   transition
///
/// /service-requests                       list, create
/// /service-requests/{id}/status           transition
/// /service-requests/{id}/assign           assign (admin, manager)
///
/// /notifications                          scoped list
/// /notifications/unread-count             scoped unread count
/// /notifications/read-all                 mark all read
/// /notifications/{id}/read                mark read
/// /notifications/{id}                     delete (admin, manager)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/rooms", rooms::router())
        .nest("/bookings", bookings::router())
        .nest("/payments", payments::router())
        .nest("/service-requests", service_requests::router())
        .nest("/notifications", notifications::router())
}
