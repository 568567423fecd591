//! Axum route handlers for profile keyword tagging.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{AppError, OrUpstream};
use crate::keywords::company::{extract_company_keywords, ExtractionError};
use crate::keywords::jobseeker::extract_jobseeker_keywords;
use crate::keywords::select_from_catalog;
use crate::models::{Keyword, KeywordOwner};
use crate::request::{require_raw, require_uuid, ValidJson};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractCompanyKeywordsRequest {
    pub company_id: Option<String>,
    pub job_description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractJobseekerKeywordsRequest {
    pub user_id: Option<String>,
    pub self_description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordsResponse {
    pub success: bool,
    pub message: String,
    pub keywords: Vec<Keyword>,
    pub keyword_ids: Vec<i64>,
}

impl KeywordsResponse {
    fn extracted(catalog: &[Keyword], keyword_ids: Vec<i64>) -> Self {
        Self {
            success: true,
            message: "키워드가 성공적으로 추출되었습니다.".to_string(),
            keywords: select_from_catalog(catalog, &keyword_ids),
            keyword_ids,
        }
    }
}

async fn load_catalog(state: &AppState) -> Result<Vec<Keyword>, AppError> {
    state
        .store
        .list_keywords()
        .await
        .or_upstream("키워드 정보를 가져오는데 실패했습니다.")
}

/// POST /extract-keywords
///
/// Company hiring description → LLM-selected catalog keywords.
pub async fn handle_extract_company_keywords(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<ExtractCompanyKeywordsRequest>,
) -> Result<Json<KeywordsResponse>, AppError> {
    let company_id = require_uuid(req.company_id, "company_id")?;
    let job_description = require_raw(req.job_description, "job_description")?;

    let catalog = load_catalog(&state).await?;

    let keyword_ids = extract_company_keywords(state.llm.as_ref(), &job_description, &catalog)
        .await
        .map_err(|e| match e {
            ExtractionError::Llm(cause) => AppError::Upstream {
                message: "AI 키워드 추출에 실패했습니다.".to_string(),
                cause: cause.into(),
            },
            parse_failure => AppError::Upstream {
                message: "AI 응답을 처리하는데 실패했습니다.".to_string(),
                cause: parse_failure.into(),
            },
        })?;

    state
        .store
        .replace_keywords(KeywordOwner::Company(company_id), &keyword_ids)
        .await
        .or_upstream("키워드 저장에 실패했습니다.")?;

    info!(%company_id, count = keyword_ids.len(), "Company keywords extracted");
    Ok(Json(KeywordsResponse::extracted(&catalog, keyword_ids)))
}

/// POST /extract-jobseeker-keywords
///
/// Job-seeker self-description → rule-matched catalog keywords. The profile must
/// exist; its description is saved even when the association update fails.
pub async fn handle_extract_jobseeker_keywords(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<ExtractJobseekerKeywordsRequest>,
) -> Result<Json<KeywordsResponse>, AppError> {
    let user_id = require_uuid(req.user_id, "user_id")?;
    let self_description = require_raw(req.self_description, "self_description")?;

    state
        .store
        .get_profile(user_id)
        .await
        .or_upstream("프로필 정보를 조회하는데 실패했습니다.")?
        .ok_or_else(|| AppError::not_found("유저 정보를 찾을 수 없습니다."))?;

    let catalog = load_catalog(&state).await?;
    let keyword_ids = extract_jobseeker_keywords(&self_description, &catalog);

    let replaced = state
        .store
        .replace_keywords(KeywordOwner::JobSeeker(user_id), &keyword_ids)
        .await;

    let described = state
        .store
        .update_description(user_id, &self_description)
        .await;

    replaced.or_upstream("키워드 저장에 실패했습니다.")?;
    described.or_upstream("자기소개 저장에 실패했습니다.")?;

    info!(%user_id, count = keyword_ids.len(), "Job-seeker keywords extracted");
    Ok(Json(KeywordsResponse::extracted(&catalog, keyword_ids)))
}
