use crate::roles::AccountStatus;
use crate::status::EntityKind;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// A create would violate a natural-key uniqueness rule.
    #[error("Duplicate entity: {0}")]
    DuplicateEntity(String),

    /// The requested status is not a member of the entity's closed set.
    #[error("Invalid {entity} status '{status}'")]
    InvalidStatus { entity: EntityKind, status: String },

    /// The requested status equals the current one and nothing else changed.
    #[error("{entity} is already '{current}'")]
    NoOpTransition { entity: EntityKind, current: String },

    /// Rejected by the strict transition table.
    #[error("{entity} cannot move from '{from}' to '{to}'")]
    IllegalTransition {
        entity: EntityKind,
        from: String,
        to: String,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    /// The token is well formed but its subject no longer exists.
    #[error("User not found")]
    UserNotFound,

    #[error("Account is {0}")]
    AccountInactive(AccountStatus),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
