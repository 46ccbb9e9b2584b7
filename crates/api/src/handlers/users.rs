//! Handlers for the `/users` resource (admin user management).
//!
//! All handlers require the `admin` role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use hotelops_core::error::CoreError;
use hotelops_core::roles::{AccountStatus, Role};
use hotelops_core::types::DbId;
use hotelops_db::models::user::{CreateUser, UserResponse};
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::normalize_email;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub password: String,
    pub role: Role,
    pub phone: Option<String>,
}

/// Request body for `PUT /users/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct AccountStatusRequest {
    pub account_status: AccountStatus,
}

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = state.stores.users.list_users().await?;
    Ok(Json(DataResponse::new(
        users.iter().map(UserResponse::from).collect(),
    )))
}

/// POST /api/v1/users
///
/// Create an account with any role (the only path to a non-guest role).
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(mut input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    input.email = normalize_email(&input.email);
    input.validate()?;
    if input.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ))
        .into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .stores
        .users
        .create_user(&CreateUser {
            name: input.name.trim().to_string(),
            email: input.email,
            password_hash,
            role: input.role,
            phone: input.phone,
        })
        .await?;

    tracing::info!(admin_id = admin.user_id, user_id = user.id, role = %user.role, "User created");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(UserResponse::from(&user))),
    ))
}

/// PUT /api/v1/users/{id}/status
pub async fn update_account_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<AccountStatusRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = state
        .stores
        .users
        .set_account_status(id, input.account_status)
        .await?
        .ok_or(CoreError::NotFound { entity: "User", id })?;

    tracing::info!(
        admin_id = admin.user_id,
        user_id = id,
        account_status = %user.account_status,
        "Account status changed"
    );
    Ok(Json(DataResponse::new(UserResponse::from(&user))))
}
