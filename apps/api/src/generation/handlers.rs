//! Axum route handlers for the Generation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{AppError, OrUpstream};
use crate::generation::cover_letter::{write_cover_letter, CoverLetterInput};
use crate::models::{KeywordOwner, Profile};
use crate::request::{require_uuid, ValidJson};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GenerateResumeRequest {
    pub user_id: Option<String>,
    pub company_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResumeResponse {
    pub success: bool,
    pub resume: String,
    pub user_profile: Profile,
    pub company_name: Option<String>,
}

/// POST /generate-resume
///
/// Job seeker + company → cover letter text, returned verbatim.
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<GenerateResumeRequest>,
) -> Result<Json<GenerateResumeResponse>, AppError> {
    let user_id = require_uuid(req.user_id, "user_id")?;
    let company_id = require_uuid(req.company_id, "company_id")?;

    let applicant = state
        .store
        .get_profile(user_id)
        .await
        .or_upstream("사용자 정보를 가져오는데 실패했습니다.")?
        .ok_or_else(|| AppError::not_found("유저 정보를 찾을 수 없습니다."))?;

    let applicant_info = state
        .store
        .get_user_info(user_id)
        .await
        .or_upstream("사용자 상세 정보를 가져오는데 실패했습니다.")?;

    let desired = state
        .store
        .keywords_for(KeywordOwner::JobSeeker(user_id))
        .await
        .or_upstream("사용자 키워드를 가져오는데 실패했습니다.")?;

    let company = state
        .store
        .get_profile(company_id)
        .await
        .or_upstream("회사 정보를 가져오는데 실패했습니다.")?
        .ok_or_else(|| AppError::not_found("회사 정보를 찾을 수 없습니다."))?;

    let offered = state
        .store
        .keywords_for(KeywordOwner::Company(company_id))
        .await
        .or_upstream("회사 키워드를 가져오는데 실패했습니다.")?;

    let resume = write_cover_letter(
        state.llm.as_ref(),
        &CoverLetterInput {
            applicant: &applicant,
            applicant_info: applicant_info.as_ref(),
            desired: &desired,
            company: &company,
            offered: &offered,
        },
    )
    .await
    .or_upstream("자기소개서 생성에 실패했습니다.")?;

    info!(%user_id, %company_id, chars = resume.chars().count(), "Cover letter generated");
    Ok(Json(GenerateResumeResponse {
        success: true,
        resume,
        user_profile: applicant,
        company_name: company.name,
    }))
}
