//! Startup creation of the first admin account.

use hotelops_core::roles::Role;
use hotelops_db::models::user::CreateUser;
use hotelops_db::UserStore;

use crate::auth::password::{hash_password, MIN_PASSWORD_LENGTH};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};
use crate::handlers::auth::normalize_email;

/// Create the configured admin unless an account with that email exists.
///
/// Returns `true` when a new account was created.
pub async fn ensure_admin(users: &dyn UserStore, admin: &BootstrapAdmin) -> AppResult<bool> {
    let email = normalize_email(&admin.email);
    if let Some(existing) = users.find_user_by_email(&email).await? {
        if existing.role != Role::Admin {
            tracing::warn!(
                user_id = existing.id,
                role = %existing.role,
                "Bootstrap admin email belongs to a non-admin account"
            );
        }
        return Ok(false);
    }

    if admin.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "ADMIN_PASSWORD must be at least {MIN_PASSWORD_LENGTH} characters long"
        )));
    }
    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = users
        .create_user(&CreateUser {
            name: "Administrator".into(),
            email,
            password_hash,
            role: Role::Admin,
            phone: None,
        })
        .await?;
    tracing::info!(user_id = user.id, "Bootstrap admin created");
    Ok(true)
}
