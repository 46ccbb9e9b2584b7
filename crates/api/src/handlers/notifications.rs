//! Handlers for the `/notifications` resource.
//!
//! Reads are filtered by the caller's [`NotificationScope`]. Notifications are
//! only ever written by the notification router worker.
//!
//! [`NotificationScope`]: hotelops_core::notification::NotificationScope

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hotelops_core::error::CoreError;
use hotelops_core::notification::NOTIFICATION_LIST_LIMIT;
use hotelops_core::types::DbId;
use hotelops_db::models::notification::Notification;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/notifications
///
/// Unread first, then newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let notifications = state
        .stores
        .notifications
        .list_notifications(&auth.notification_scope(), NOTIFICATION_LIST_LIMIT)
        .await?;
    Ok(Json(DataResponse::new(notifications)))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    let count = state
        .stores
        .notifications
        .unread_count(&auth.notification_scope())
        .await?;

    Ok(Json(serde_json::json!({
        "data": { "count": count }
    })))
}

/// PUT /api/v1/notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Notification>>> {
    let notification = state
        .stores
        .notifications
        .mark_read(id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Notification",
            id,
        })?;
    Ok(Json(DataResponse::new(notification)))
}

/// PUT /api/v1/notifications/read-all
///
/// Global: marks every unread notification, not only the caller's.
pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<serde_json::Value>> {
    let updated = state.stores.notifications.mark_all_read().await?;
    tracing::info!(user_id = auth.user_id, updated, "All notifications marked read");

    Ok(Json(serde_json::json!({
        "data": { "updated": updated }
    })))
}

/// DELETE /api/v1/notifications/{id}
pub async fn delete_notification(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !state.stores.notifications.delete_notification(id).await? {
        return Err(CoreError::NotFound {
            entity: "Notification",
            id,
        }
        .into());
    }
    tracing::info!(user_id = manager.user_id, notification_id = id, "Notification deleted");
    Ok(StatusCode::NO_CONTENT)
}
