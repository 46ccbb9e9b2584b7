//! Role-gated extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role is not
//! on its allow-list. Routes with mixed or ownership-dependent rules call
//! [`AuthUser::require_role`] inside the handler instead.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use hotelops_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require_role(&[Role::Admin])?;
        Ok(RequireAdmin(user))
    }
}

/// Requires `admin` or `manager`.
pub struct RequireManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require_role(&[Role::Admin, Role::Manager])?;
        Ok(RequireManager(user))
    }
}
