//! Handlers for the `/rooms` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hotelops_core::error::CoreError;
use hotelops_core::roles::{Permission, Role};
use hotelops_core::status::RoomStatus;
use hotelops_core::transition::{check_transition, TransitionOutcome};
use hotelops_core::types::DbId;
use hotelops_db::models::room::{CreateRoom, Room};
use hotelops_events::DomainEvent;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Roles allowed to change a room's status.
pub const ROOM_STATUS_ROLES: &[Role] = &[
    Role::Admin,
    Role::Manager,
    Role::Receptionist,
    Role::Housekeeping,
    Role::Staff,
];

/// Request body for `POST /rooms`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoomRequest {
    #[validate(length(min = 1, max = 20))]
    pub room_number: String,
    #[validate(length(min = 1, max = 50))]
    pub room_type: String,
    #[validate(range(min = 0.0))]
    pub price_per_night: f64,
    #[serde(default)]
    pub floor: i32,
}

/// Request body for `PUT /rooms/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct RoomStatusRequest {
    pub status: String,
    /// Defaults to "unchanged" when the status is unchanged, otherwise to
    /// whether the new status is `available`.
    pub is_available: Option<bool>,
}

/// GET /api/v1/rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    _auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<Room>>>> {
    let rooms = state.stores.rooms.list_rooms().await?;
    Ok(Json(DataResponse::new(rooms)))
}

/// POST /api/v1/rooms
pub async fn create_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateRoomRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Room>>)> {
    auth.require_permission(&state, Permission::ManageRooms)?;
    input.validate()?;

    let room = state
        .stores
        .rooms
        .create_room(&CreateRoom {
            room_number: input.room_number.trim().to_string(),
            room_type: input.room_type,
            price_per_night: input.price_per_night,
            floor: input.floor,
        })
        .await?;

    tracing::info!(user_id = auth.user_id, room_id = room.id, "Room created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(room))))
}

/// PUT /api/v1/rooms/{id}/status
pub async fn update_room_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<RoomStatusRequest>,
) -> AppResult<Json<DataResponse<Room>>> {
    auth.require_role(ROOM_STATUS_ROLES)?;

    let room = find_room(&state, id).await?;
    let next: RoomStatus = input.status.trim().parse()?;
    let is_available = input.is_available.unwrap_or(if next == room.status {
        room.is_available
    } else {
        next == RoomStatus::Available
    });

    let outcome = check_transition(
        room.id,
        room.status,
        next,
        is_available != room.is_available,
        state.transition_policy(),
    )?;

    let updated = state
        .stores
        .rooms
        .update_room_status(room.id, next, is_available)
        .await?
        .ok_or(CoreError::NotFound { entity: "Room", id })?;

    tracing::info!(
        user_id = auth.user_id,
        room_id = id,
        from = %room.status,
        to = %next,
        is_available,
        "Room status updated"
    );
    publish_room_outcome(&state, &updated, outcome);

    Ok(Json(DataResponse::new(updated)))
}

/// DELETE /api/v1/rooms/{id}
///
/// Hard delete; not for general use.
pub async fn delete_room(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !state.stores.rooms.delete_room(id).await? {
        return Err(CoreError::NotFound { entity: "Room", id }.into());
    }
    tracing::warn!(admin_id = admin.user_id, room_id = id, "Room hard-deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) async fn find_room(state: &AppState, id: DbId) -> AppResult<Room> {
    let room = state.stores.rooms.find_room(id).await?;
    room.ok_or_else(|| CoreError::NotFound { entity: "Room", id }.into())
}

fn publish_room_outcome(state: &AppState, room: &Room, outcome: TransitionOutcome<RoomStatus>) {
    if let TransitionOutcome::Changed(transition) = outcome {
        state.events.publish(DomainEvent::RoomTransition {
            room_number: room.room_number.clone(),
            transition,
        });
    }
}

/// Move a room as a side effect of another entity's transition.
///
/// Runs through the same validator as a direct update. A cascade that
/// would be a no-op is skipped silently; one the active policy rejects, or
/// one the store fails, is skipped with a warning. The triggering write has
/// already been persisted either way.
pub(crate) async fn cascade_room_status(
    state: &AppState,
    room_id: DbId,
    target: RoomStatus,
    is_available: bool,
) {
    if let Err(e) = try_cascade(state, room_id, target, is_available).await {
        tracing::warn!(room_id, to = %target, error = %e, "Room cascade skipped");
    }
}

async fn try_cascade(
    state: &AppState,
    room_id: DbId,
    target: RoomStatus,
    is_available: bool,
) -> AppResult<()> {
    let room = find_room(state, room_id).await?;

    let outcome = match check_transition(
        room.id,
        room.status,
        target,
        is_available != room.is_available,
        state.transition_policy(),
    ) {
        Err(CoreError::NoOpTransition { .. }) => return Ok(()),
        other => other?,
    };

    if let Some(updated) = state
        .stores
        .rooms
        .update_room_status(room.id, target, is_available)
        .await?
    {
        tracing::info!(room_id, from = %room.status, to = %target, "Room status cascaded");
        publish_room_outcome(state, &updated, outcome);
    }
    Ok(())
}
