use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hotelops_core::error::CoreError;
use hotelops_db::StoreError;
use serde_json::{json, Map, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce `{ "error", "code", ...details }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Core(err.into())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Core(CoreError::Validation(errors.to_string()))
    }
}

const INTERNAL_MESSAGE: &str = "An internal error occurred";

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = Map::new();

        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::DuplicateEntity(_) => (
                    StatusCode::CONFLICT,
                    "DUPLICATE_ENTITY",
                    core.to_string(),
                ),
                CoreError::InvalidStatus { entity, .. } => {
                    details.insert("allowed".into(), json!(entity.allowed_statuses()));
                    (StatusCode::BAD_REQUEST, "INVALID_STATUS", core.to_string())
                }
                CoreError::NoOpTransition { current, .. } => {
                    details.insert("current_status".into(), json!(current));
                    (StatusCode::BAD_REQUEST, "NO_OP_TRANSITION", core.to_string())
                }
                CoreError::IllegalTransition { from, to, .. } => {
                    details.insert("from".into(), json!(from));
                    details.insert("to".into(), json!(to));
                    (StatusCode::CONFLICT, "ILLEGAL_TRANSITION", core.to_string())
                }
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::InvalidToken => {
                    (StatusCode::UNAUTHORIZED, "INVALID_TOKEN", core.to_string())
                }
                CoreError::ExpiredToken => {
                    (StatusCode::UNAUTHORIZED, "EXPIRED_TOKEN", core.to_string())
                }
                CoreError::UserNotFound => {
                    (StatusCode::UNAUTHORIZED, "USER_NOT_FOUND", core.to_string())
                }
                CoreError::AccountInactive(account_status) => {
                    details.insert("account_status".into(), json!(account_status));
                    (StatusCode::FORBIDDEN, "ACCOUNT_INACTIVE", core.to_string())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::StoreUnavailable(msg) => {
                    tracing::error!(error = %msg, "Store unavailable");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORE_UNAVAILABLE",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        INTERNAL_MESSAGE.to_string(),
                    )
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let mut body = Map::new();
        body.insert("error".into(), Value::String(message));
        body.insert("code".into(), Value::String(code.into()));
        body.extend(details);

        (status, axum::Json(Value::Object(body))).into_response()
    }
}
