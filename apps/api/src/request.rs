//! Request-body extraction and field validation shared by all handlers.

use axum::extract::FromRequest;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::UserType;

/// `axum::Json` whose rejections (malformed JSON, unknown fields) become 400 `AppError`s.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ValidJson<T>(pub T);

/// Returns the value exactly as sent, treating absent and blank fields alike as missing.
///
/// Use for free text and secrets, where surrounding whitespace is part of the value.
pub fn require_raw(value: Option<String>, field: &str) -> Result<String, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::validation(format!(
            "필수 정보가 누락되었습니다. ({field})"
        ))),
    }
}

/// Like [`require_raw`] but trimmed. Use for identifiers, enums and phone numbers.
pub fn require(value: Option<String>, field: &str) -> Result<String, AppError> {
    require_raw(value, field).map(|v| v.trim().to_string())
}

pub fn require_uuid(value: Option<String>, field: &str) -> Result<Uuid, AppError> {
    let raw = require(value, field)?;
    Uuid::parse_str(&raw)
        .map_err(|_| AppError::validation(format!("{field} 형식이 올바르지 않습니다.")))
}

pub fn parse_user_type(raw: &str, field: &str) -> Result<UserType, AppError> {
    raw.parse()
        .map_err(|_| AppError::validation(format!("{field} 값이 올바르지 않습니다.")))
}
