//! Fixed notification texts. Absent profile fields render as `미입력`.

use crate::models::keyword::format_keyword_list;
use crate::models::{Keyword, Profile};

const MISSING: &str = "미입력";
const NO_KEYWORDS: &str = "미등록";

fn field(value: &Option<String>) -> &str {
    value.as_deref().filter(|v| !v.trim().is_empty()).unwrap_or(MISSING)
}

/// Sent to a company when a job seeker applies.
pub fn applicant_to_company(applicant: &Profile, keywords: &[Keyword]) -> String {
    let keyword_list = format_keyword_list(keywords).unwrap_or_else(|| NO_KEYWORDS.to_string());
    let description = applicant
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("자기소개가 없습니다.");

    format!(
        "[잡매칭 지원 알림]

새로운 지원자가 있습니다!

▶ 지원자 정보
• 이름: {name}
• 연락처: {phone}
• 이메일: {email}
• 비자: {visa}
• 거주지: {address}
• 한국어 수준: {korean_level}

▶ 관심 분야
{keyword_list}

▶ 자기소개
{description}

지원자와 연락을 원하시면 위 연락처로 연락 부탁드립니다.",
        name = field(&applicant.name),
        phone = field(&applicant.phone_number),
        email = field(&applicant.email),
        visa = field(&applicant.visa),
        address = field(&applicant.address),
        korean_level = field(&applicant.korean_level),
    )
}

/// Sent to a job seeker when a company shows interest.
pub fn company_to_applicant(company: &Profile, keywords: &[Keyword]) -> String {
    let keyword_list = format_keyword_list(keywords).unwrap_or_else(|| NO_KEYWORDS.to_string());
    let description = company
        .description
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or("회사 소개가 없습니다.");

    format!(
        "[잡매칭 관심 기업 알림]

귀하의 프로필에 관심있는 기업이 있습니다!

▶ 기업 정보
• 회사명: {name}
• 연락처: {phone}
• 이메일: {email}
• 웹사이트: {website}
• 주소: {address}

▶ 채용 분야
{keyword_list}

▶ 회사 소개
{description}

관심이 있으시면 위 연락처로 연락 부탁드립니다.",
        name = field(&company.name),
        phone = field(&company.phone_number),
        email = field(&company.email),
        website = field(&company.website),
        address = field(&company.address),
    )
}

/// Text of a self-issued verification code.
pub fn otp_message(code: &str) -> String {
    format!("[잡매칭] 인증번호는 [{code}] 입니다. 5분 내에 입력해주세요.")
}
