//! Handlers for the `/service-requests` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hotelops_core::error::CoreError;
use hotelops_core::roles::Role;
use hotelops_core::service_request::ServiceRequestType;
use hotelops_core::status::ServiceRequestStatus;
use hotelops_core::transition::check_transition;
use hotelops_core::types::DbId;
use hotelops_db::models::service_request::{CreateServiceRequest, ServiceRequest};
use hotelops_events::DomainEvent;
use serde::Deserialize;
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::rooms::find_room;
use crate::handlers::{completion_stamp, StatusUpdateRequest};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// Roles allowed to change a request's status.
pub const SERVICE_REQUEST_STATUS_ROLES: &[Role] = &[
    Role::Admin,
    Role::Manager,
    Role::Receptionist,
    Role::Housekeeping,
    Role::Staff,
];

/// Request body for `POST /service-requests`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateServiceRequestRequest {
    pub room_id: Option<DbId>,
    pub request_type: ServiceRequestType,
    #[validate(length(min = 1, max = 2000))]
    pub description: String,
}

/// Request body for `PUT /service-requests/{id}/assign`.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub assignee_id: DbId,
}

/// GET /api/v1/service-requests
///
/// Guests see only the requests they reported.
pub async fn list_service_requests(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ServiceRequest>>>> {
    let reporter = auth.is_guest().then_some(auth.user_id);
    let requests = state
        .stores
        .service_requests
        .list_service_requests(reporter)
        .await?;
    Ok(Json(DataResponse::new(requests)))
}

/// POST /api/v1/service-requests
pub async fn create_service_request(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateServiceRequestRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ServiceRequest>>)> {
    input.validate()?;
    let description = input.description.trim().to_string();
    if description.is_empty() {
        return Err(CoreError::Validation("description must not be blank".into()).into());
    }
    if let Some(room_id) = input.room_id {
        find_room(&state, room_id).await?;
    }

    let request = state
        .stores
        .service_requests
        .create_service_request(&CreateServiceRequest {
            reported_by: auth.user_id,
            room_id: input.room_id,
            request_type: input.request_type,
            description,
        })
        .await?;

    tracing::info!(
        user_id = auth.user_id,
        request_id = request.id,
        request_type = %request.request_type,
        "Service request opened"
    );
    state.events.publish(DomainEvent::ServiceRequestCreated {
        request_id: request.id,
        request_type: request.request_type,
        description: request.description.clone(),
    });

    Ok((StatusCode::CREATED, Json(DataResponse::new(request))))
}

/// PUT /api/v1/service-requests/{id}/status
pub async fn update_service_request_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<StatusUpdateRequest>,
) -> AppResult<Json<DataResponse<ServiceRequest>>> {
    auth.require_role(SERVICE_REQUEST_STATUS_ROLES)?;

    let request = find_service_request(&state, id).await?;
    let next: ServiceRequestStatus = input.status.trim().parse()?;
    let outcome = check_transition(
        request.id,
        request.status,
        next,
        false,
        state.transition_policy(),
    )?;

    let updated = state
        .stores
        .service_requests
        .update_service_request_status(request.id, next, completion_stamp(next))
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ServiceRequest",
            id,
        })?;

    tracing::info!(
        user_id = auth.user_id,
        request_id = id,
        from = %request.status,
        to = %next,
        "Service request status updated"
    );
    if let Some(transition) = outcome.accepted() {
        state.events.publish(DomainEvent::ServiceRequestTransition {
            reported_by: request.reported_by,
            transition: *transition,
        });
    }

    Ok(Json(DataResponse::new(updated)))
}

/// PUT /api/v1/service-requests/{id}/assign
///
/// Assigns a staff member. A `pending` request moves to `in_progress`.
pub async fn assign_service_request(
    State(state): State<AppState>,
    RequireManager(manager): RequireManager,
    Path(id): Path<DbId>,
    Json(input): Json<AssignRequest>,
) -> AppResult<Json<DataResponse<ServiceRequest>>> {
    let request = find_service_request(&state, id).await?;

    let assignee = state
        .stores
        .users
        .find_user(input.assignee_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "User",
            id: input.assignee_id,
        })?;
    if !assignee.role.is_staff() {
        return Err(CoreError::Validation(format!(
            "User {} is not a staff member",
            assignee.id
        ))
        .into());
    }

    let (status, transition) = if request.status == ServiceRequestStatus::Pending {
        let outcome = check_transition(
            request.id,
            request.status,
            ServiceRequestStatus::InProgress,
            false,
            state.transition_policy(),
        )?;
        (ServiceRequestStatus::InProgress, outcome.accepted().copied())
    } else {
        (request.status, None)
    };

    let updated = state
        .stores
        .service_requests
        .assign_service_request(request.id, assignee.id, status)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "ServiceRequest",
            id,
        })?;

    tracing::info!(
        manager_id = manager.user_id,
        request_id = id,
        assignee_id = assignee.id,
        status = %updated.status,
        "Service request assigned"
    );
    state.events.publish(DomainEvent::ServiceRequestAssigned {
        request_id: updated.id,
        assignee_id: assignee.id,
    });
    if let Some(transition) = transition {
        state.events.publish(DomainEvent::ServiceRequestTransition {
            reported_by: request.reported_by,
            transition,
        });
    }

    Ok(Json(DataResponse::new(updated)))
}

async fn find_service_request(state: &AppState, id: DbId) -> AppResult<ServiceRequest> {
    let request = state.stores.service_requests.find_service_request(id).await?;
    request.ok_or_else(|| {
        CoreError::NotFound {
            entity: "ServiceRequest",
            id,
        }
        .into()
    })
}
