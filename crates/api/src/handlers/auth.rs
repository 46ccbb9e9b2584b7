//! Handlers for the `/auth` resource (register, login, profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use hotelops_core::error::CoreError;
use hotelops_core::roles::Role;
use hotelops_db::models::user::{CreateUser, User, UserResponse};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{issue_token, TokenFlow};
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/register
///
/// Self-registration. Always creates a `guest`.
pub async fn register(
    State(state): State<AppState>,
    Json(mut input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<AuthResponse>>)> {
    input.email = normalize_email(&input.email);
    input.validate()?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = state
        .stores
        .users
        .create_user(&CreateUser {
            name: input.name.trim().to_string(),
            email: input.email,
            password_hash,
            role: Role::Guest,
            phone: input.phone,
        })
        .await?;

    tracing::info!(user_id = user.id, "Guest registered");

    let response = auth_response(&state, &user, TokenFlow::GuestSession)?;
    Ok((StatusCode::CREATED, Json(DataResponse::new(response))))
}

/// POST /api/v1/auth/login
///
/// Guests get a guest-session token; every other role a staff-login token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<AuthResponse>>> {
    let invalid = || CoreError::Unauthorized("Invalid email or password".into());

    let user = state
        .stores
        .users
        .find_user_by_email(&normalize_email(&input.email))
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::debug!(user_id = user.id, "Login rejected: bad password");
        return Err(invalid().into());
    }

    user.account_status.ensure_active()?;

    let response = auth_response(&state, &user, TokenFlow::for_role(user.role))?;
    tracing::info!(user_id = user.id, role = %user.role, "User logged in");
    Ok(Json(DataResponse::new(response)))
}

/// GET /api/v1/auth/profile
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = state
        .stores
        .users
        .find_user(auth.user_id)
        .await?
        .ok_or(CoreError::UserNotFound)?;
    Ok(Json(DataResponse::new(UserResponse::from(&user))))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn auth_response(state: &AppState, user: &User, flow: TokenFlow) -> AppResult<AuthResponse> {
    let token = issue_token(user.id, user.role, &user.email, flow, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    Ok(AuthResponse {
        token,
        user: UserResponse::from(user),
    })
}
