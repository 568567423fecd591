//! Axum route handlers for applicant/company notifications.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::{AppError, OrUpstream};
use crate::messaging::templates;
use crate::messaging::OutboundSms;
use crate::models::{Keyword, KeywordOwner, Profile};
use crate::otp::phone::normalize;
use crate::request::{require, require_uuid, ValidJson};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageToCompanyRequest {
    pub user_id: Option<String>,
    pub company_number: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MessageToUserRequest {
    pub company_id: Option<String>,
    pub user_number: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
    pub message_id: String,
}

/// Profile and its resolved keywords.
async fn load_sender(
    state: &AppState,
    owner: KeywordOwner,
    not_found: &str,
) -> Result<(Profile, Vec<Keyword>), AppError> {
    let profile = state
        .store
        .get_profile(owner.id())
        .await
        .or_upstream("프로필 정보를 조회하는데 실패했습니다.")?
        .ok_or_else(|| AppError::not_found(not_found))?;

    let keywords = state
        .store
        .keywords_for(owner)
        .await
        .or_upstream("키워드 정보를 가져오는데 실패했습니다.")?;

    Ok((profile, keywords))
}

async fn dispatch(
    state: &AppState,
    to: String,
    text: String,
) -> Result<Json<MessageResponse>, AppError> {
    let receipt = state
        .sms
        .send(vec![OutboundSms {
            to,
            from: state.config.sender_phone.clone(),
            text,
        }])
        .await
        .or_upstream("메시지 전송에 실패했습니다.")?;

    info!(group_id = %receipt.group_id, "Notification sent");
    Ok(Json(MessageResponse {
        success: true,
        message: "메시지가 성공적으로 전송되었습니다.".to_string(),
        message_id: receipt.group_id,
    }))
}

/// POST /send-message-to-company
///
/// Notifies a company that a job seeker applied.
pub async fn handle_send_message_to_company(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<MessageToCompanyRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let user_id: Uuid = require_uuid(req.user_id, "user_id")?;
    let company_number = normalize(&require(req.company_number, "company_number")?);

    let (profile, keywords) = load_sender(
        &state,
        KeywordOwner::JobSeeker(user_id),
        "유저 정보를 찾을 수 없습니다.",
    )
    .await?;

    let text = templates::applicant_to_company(&profile, &keywords);
    dispatch(&state, company_number, text).await
}

/// POST /send-message-to-user
///
/// Notifies a job seeker that a company is interested.
pub async fn handle_send_message_to_user(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<MessageToUserRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let company_id: Uuid = require_uuid(req.company_id, "company_id")?;
    let user_number = normalize(&require(req.user_number, "user_number")?);

    let (profile, keywords) = load_sender(
        &state,
        KeywordOwner::Company(company_id),
        "회사 정보를 찾을 수 없습니다.",
    )
    .await?;

    let text = templates::company_to_applicant(&profile, &keywords);
    dispatch(&state, user_number, text).await
}
