//! Rule-based keyword selection for job-seeker self-descriptions.
//!
//! A keyword is selected when any of its trigger substrings occurs in the
//! lower-cased description. Afterwards every required category holds at
//! least one keyword, filled from a fixed default when nothing matched.
//! No external calls; same text and catalog always give the same ids.

use std::collections::BTreeSet;

use crate::models::keyword::category;
use crate::models::Keyword;

/// Catalog label and the substrings (Korean and lower-case English) that select it.
pub struct KeywordRule {
    pub label: &'static str,
    pub triggers: &'static [&'static str],
}

pub static KEYWORD_RULES: &[KeywordRule] = &[
    // 직종
    KeywordRule {
        label: "주방",
        triggers: &["주방", "요리", "조리", "kitchen", "cook", "chef"],
    },
    KeywordRule {
        label: "서빙",
        triggers: &["서빙", "홀서빙", "웨이터", "serving", "waiter", "waitress"],
    },
    KeywordRule {
        label: "생산",
        triggers: &["생산", "공장", "제조", "factory", "production", "manufactur"],
    },
    KeywordRule {
        label: "건설",
        triggers: &["건설", "공사", "건축", "construction"],
    },
    KeywordRule {
        label: "농업",
        triggers: &["농업", "농장", "농사", "비닐하우스", "farm", "agricultur"],
    },
    KeywordRule {
        label: "어업",
        triggers: &["어업", "어선", "양식장", "fishing", "fishery"],
    },
    KeywordRule {
        label: "물류",
        triggers: &["물류", "택배", "창고", "상하차", "logistics", "warehouse", "delivery"],
    },
    KeywordRule {
        label: "청소",
        triggers: &["청소", "미화", "cleaning", "cleaner", "housekeeping"],
    },
    KeywordRule {
        label: "판매",
        triggers: &["판매", "매장", "편의점", "계산", "sales", "cashier", "retail"],
    },
    KeywordRule {
        label: "사무",
        triggers: &["사무", "행정", "office", "clerical"],
    },
    KeywordRule {
        label: "통역",
        triggers: &["통역", "번역", "interpret", "translat"],
    },
    KeywordRule {
        label: "돌봄",
        triggers: &["돌봄", "간병", "요양", "caregiver", "nursing"],
    },
    // 지역
    KeywordRule {
        label: "서울",
        triggers: &["서울", "seoul"],
    },
    KeywordRule {
        label: "경기",
        triggers: &["경기", "수원", "성남", "안산", "화성", "평택", "gyeonggi", "suwon", "ansan"],
    },
    KeywordRule {
        label: "인천",
        triggers: &["인천", "incheon"],
    },
    KeywordRule {
        label: "부산",
        triggers: &["부산", "busan"],
    },
    KeywordRule {
        label: "대구",
        triggers: &["대구", "daegu"],
    },
    KeywordRule {
        label: "대전",
        triggers: &["대전", "daejeon"],
    },
    KeywordRule {
        label: "광주",
        triggers: &["광주", "gwangju"],
    },
    KeywordRule {
        label: "울산",
        triggers: &["울산", "ulsan"],
    },
    KeywordRule {
        label: "제주",
        triggers: &["제주", "jeju"],
    },
    // 복지
    KeywordRule {
        label: "기숙사",
        triggers: &["기숙사", "숙소", "숙식", "dormitory", "dorm", "housing", "accommodation"],
    },
    KeywordRule {
        label: "식사제공",
        triggers: &["식사", "식비", "중식 제공", "meal", "food provided"],
    },
    KeywordRule {
        label: "4대보험",
        triggers: &["4대보험", "4대 보험", "insurance"],
    },
    KeywordRule {
        label: "교통비",
        triggers: &["교통비", "통근", "셔틀", "shuttle", "transportation"],
    },
    KeywordRule {
        label: "비자지원",
        triggers: &["비자 지원", "비자지원", "비자 연장", "visa support", "visa sponsor"],
    },
    // 경력
    KeywordRule {
        label: "신입",
        triggers: &["신입", "무경력", "경력 없", "처음", "beginner", "no experience", "newcomer"],
    },
    KeywordRule {
        label: "경력",
        triggers: &["경력", "년차", "experienced", "years of experience"],
    },
    // 언어
    KeywordRule {
        label: "한국어 가능",
        triggers: &["한국어", "topik", "korean"],
    },
    KeywordRule {
        label: "영어 가능",
        triggers: &["영어", "english"],
    },
    KeywordRule {
        label: "중국어 가능",
        triggers: &["중국어", "chinese", "mandarin"],
    },
    KeywordRule {
        label: "베트남어 가능",
        triggers: &["베트남어", "vietnamese"],
    },
    // 근무기간
    KeywordRule {
        label: "단기",
        triggers: &["단기", "알바", "아르바이트", "일용", "short-term", "short term", "part-time", "part time", "temporary"],
    },
    KeywordRule {
        label: "장기",
        triggers: &["장기", "정규직", "오래", "long-term", "long term", "permanent", "full-time", "full time"],
    },
];

/// (category, default label) pairs that every result must cover.
pub static REQUIRED_CATEGORY_DEFAULTS: &[(&str, &str)] = &[
    (category::JOB, "생산"),
    (category::REGION, "서울"),
    (category::BENEFIT, "4대보험"),
    (category::WORK_DURATION, "장기"),
];

/// Labels whose triggers occur in `description`, in rule order.
pub fn matched_labels(description: &str) -> Vec<&'static str> {
    let text = description.to_lowercase();
    KEYWORD_RULES
        .iter()
        .filter(|rule| rule.triggers.iter().any(|t| text.contains(t)))
        .map(|rule| rule.label)
        .collect()
}

/// Selected catalog ids, ascending. Each required category present in the
/// catalog contributes at least one id, even for an empty description.
pub fn extract_jobseeker_keywords(description: &str, catalog: &[Keyword]) -> Vec<i64> {
    let labels = matched_labels(description);
    let mut selected: BTreeSet<i64> = catalog
        .iter()
        .filter(|k| labels.contains(&k.keyword.as_str()))
        .map(|k| k.id)
        .collect();

    for &(required, default_label) in REQUIRED_CATEGORY_DEFAULTS {
        let covered = catalog
            .iter()
            .any(|k| k.category == required && selected.contains(&k.id));
        if covered {
            continue;
        }

        let fallback = catalog
            .iter()
            .find(|k| k.category == required && k.keyword == default_label)
            .or_else(|| {
                catalog
                    .iter()
                    .filter(|k| k.category == required)
                    .min_by_key(|k| k.id)
            });
        if let Some(keyword) = fallback {
            selected.insert(keyword.id);
        }
    }

    selected.into_iter().collect()
}
