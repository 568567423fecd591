use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Generic message returned for failures that carry no more specific text.
pub const GENERIC_SERVER_ERROR: &str = "서버 오류가 발생했습니다.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate resource. Reported as 400 to match the client contract.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The auth provider refused to create the identity; its message is passed through.
    #[error("Auth provider rejected request: {0}")]
    AuthRejected(String),

    #[error("OTP rejected: {0}")]
    OtpRejected(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// An external collaborator failed. `message` goes to the client, `cause` only to the log.
    #[error("{message}: {cause}")]
    Upstream {
        message: String,
        cause: anyhow::Error,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::Conflict(_)
            | AppError::AuthRejected(_)
            | AppError::OtpRejected(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("잘못된 요청 형식입니다: {}", rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match self {
            AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::AuthRejected(msg)
            | AppError::OtpRejected(msg)
            | AppError::NotFound(msg) => msg,
            AppError::Upstream { message, cause } => {
                tracing::error!("Upstream failure ({message}): {cause:?}");
                message
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                GENERIC_SERVER_ERROR.to_string()
            }
        };

        let body = Json(json!({
            "success": false,
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Converts a collaborator error into `AppError::Upstream` with a client-facing message.
pub trait OrUpstream<T> {
    fn or_upstream(self, message: &str) -> Result<T, AppError>;
}

impl<T, E> OrUpstream<T> for Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn or_upstream(self, message: &str) -> Result<T, AppError> {
        self.map_err(|e| AppError::Upstream {
            message: message.to_string(),
            cause: e.into(),
        })
    }
}
