//! Token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use hotelops_core::error::CoreError;
use hotelops_core::notification::NotificationScope;
use hotelops_core::roles::{authorize, Permission, Role};
use hotelops_core::types::DbId;

use crate::auth::jwt::verify_token;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// A verified, live identity.
///
/// Extraction runs the whole authentication chain: bearer token present,
/// signature and expiry valid, subject still exists, account active.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     user.require_role(&[Role::Admin, Role::Manager])?;
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub role: Role,
    pub email: String,
}

impl AuthUser {
    /// Route-level allow-list. Fails closed with `Forbidden`.
    pub fn require_role(&self, allowed: &[Role]) -> AppResult<()> {
        authorize(self.role, allowed).map_err(AppError::from)
    }

    /// Permission-matrix check against the matrix in application state.
    pub fn require_permission(&self, state: &AppState, permission: Permission) -> AppResult<()> {
        state
            .permissions
            .require(self.role, permission)
            .map_err(AppError::from)
    }

    pub fn is_guest(&self) -> bool {
        self.role == Role::Guest
    }

    /// Filter applied when this identity reads notifications.
    pub fn notification_scope(&self) -> NotificationScope {
        NotificationScope::for_identity(self.role, self.user_id)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| CoreError::Unauthorized("Missing Authorization header".into()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            CoreError::Unauthorized("Invalid Authorization format. Expected: Bearer <token>".into())
        })?;

        let claims = verify_token(token.trim(), &state.config.jwt)?;

        let user = state
            .stores
            .users
            .find_user(claims.user_id)
            .await?
            .ok_or(CoreError::UserNotFound)?;
        user.account_status.ensure_active()?;

        Ok(AuthUser {
            user_id: user.id,
            role: claims.role,
            email: claims.email,
        })
    }
}
