//! Cover-letter prompt assembly and completion.
//!
//! The prompt joins the job seeker's profile, the optional `user_info` row and
//! both keyword sets. The generated text is returned as-is.

use std::collections::BTreeMap;

use crate::generation::prompts::{COVER_LETTER_PROMPT_TEMPLATE, COVER_LETTER_SYSTEM};
use crate::llm_client::prompts::{fill_template, POLITE_KOREAN_TONE};
use crate::llm_client::{CompletionProvider, CompletionRequest, LlmError};
use crate::models::{Keyword, Profile, UserInfo};

const TEMPERATURE: f32 = 0.7;
const MISSING: &str = "정보 없음";
const NO_KEYWORDS: &str = "- 등록된 조건 없음";

/// Everything the prompt is built from.
pub struct CoverLetterInput<'a> {
    pub applicant: &'a Profile,
    pub applicant_info: Option<&'a UserInfo>,
    pub desired: &'a [Keyword],
    pub company: &'a Profile,
    pub offered: &'a [Keyword],
}

fn text(value: Option<&str>) -> &str {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(MISSING)
}

/// `user_info` value, then the profile's own column, then `정보 없음`.
fn preferred<'a>(from_info: Option<&'a str>, from_profile: Option<&'a str>) -> &'a str {
    text(from_info.filter(|v| !v.trim().is_empty()).or(from_profile))
}

/// One `- category: a, b` line per category, categories in first-seen order.
pub fn group_by_category(keywords: &[Keyword]) -> String {
    if keywords.is_empty() {
        return NO_KEYWORDS.to_string();
    }

    let mut order: Vec<&str> = Vec::new();
    let mut grouped: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for k in keywords {
        if !grouped.contains_key(k.category.as_str()) {
            order.push(k.category.as_str());
        }
        grouped
            .entry(k.category.as_str())
            .or_default()
            .push(k.keyword.as_str());
    }

    order
        .into_iter()
        .map(|category| format!("- {category}: {}", grouped[category].join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}

fn applicant_section(profile: &Profile, info: Option<&UserInfo>) -> String {
    let age = info
        .and_then(|i| i.age)
        .map(|a| format!("{a}세"))
        .unwrap_or_else(|| MISSING.to_string());

    format!(
        "- 이름: {name}\n- 나이: {age}\n- 성별: {gender}\n- 국적: {country}\n- 비자: {visa}\n\
         - 한국어 수준: {korean_level}\n- 경력: {experience}\n- 희망 근무 시작일: {start}\n\
         - 거주지: {address}\n- 자기소개: {introduction}",
        name = preferred(info.and_then(|i| i.name.as_deref()), profile.name.as_deref()),
        gender = text(info.and_then(|i| i.gender.as_deref())),
        country = text(info.and_then(|i| i.country.as_deref())),
        visa = preferred(info.and_then(|i| i.visa.as_deref()), profile.visa.as_deref()),
        korean_level = preferred(
            info.and_then(|i| i.korean_level.as_deref()),
            profile.korean_level.as_deref(),
        ),
        experience = text(info.and_then(|i| i.experience.as_deref())),
        start = text(info.and_then(|i| i.preferred_start.as_deref())),
        address = text(profile.address.as_deref()),
        introduction = preferred(
            info.and_then(|i| i.introduction.as_deref()),
            profile.description.as_deref(),
        ),
    )
}

fn company_section(company: &Profile) -> String {
    format!(
        "- 회사명: {name}\n- 주소: {address}\n- 웹사이트: {website}\n- 회사 소개: {description}",
        name = text(company.name.as_deref()),
        address = text(company.address.as_deref()),
        website = text(company.website.as_deref()),
        description = text(company.description.as_deref()),
    )
}

pub fn build_prompt(input: &CoverLetterInput<'_>) -> String {
    let applicant = applicant_section(input.applicant, input.applicant_info);
    let desired = group_by_category(input.desired);
    let company = company_section(input.company);
    let offered = group_by_category(input.offered);

    fill_template(
        COVER_LETTER_PROMPT_TEMPLATE,
        &[
            ("applicant", applicant.as_str()),
            ("desired", desired.as_str()),
            ("company", company.as_str()),
            ("offered", offered.as_str()),
            ("company_name", text(input.company.name.as_deref())),
            ("tone", POLITE_KOREAN_TONE),
        ],
    )
}

pub async fn write_cover_letter(
    llm: &dyn CompletionProvider,
    input: &CoverLetterInput<'_>,
) -> Result<String, LlmError> {
    let prompt = build_prompt(input);
    llm.complete(CompletionRequest {
        system: COVER_LETTER_SYSTEM,
        prompt: &prompt,
        temperature: TEMPERATURE,
    })
    .await
}
