use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Category labels used by the seeded keyword catalog.
pub mod category {
    pub const JOB: &str = "직종";
    pub const REGION: &str = "지역";
    pub const BENEFIT: &str = "복지";
    pub const WORK_DURATION: &str = "근무기간";
    // Seeded in the catalog, but no extraction rule requires them.
    #[allow(dead_code)]
    pub const EXPERIENCE: &str = "경력";
    #[allow(dead_code)]
    pub const LANGUAGE: &str = "언어";
}

/// Priority written for every keyword association.
pub const DEFAULT_PRIORITY: i32 = 2;

/// A catalog entry from the `keyword` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Keyword {
    pub id: i64,
    pub keyword: String,
    pub category: String,
}

/// Which association table a keyword set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordOwner {
    JobSeeker(Uuid),
    Company(Uuid),
}

impl KeywordOwner {
    pub fn id(&self) -> Uuid {
        match self {
            KeywordOwner::JobSeeker(id) | KeywordOwner::Company(id) => *id,
        }
    }
}

/// Renders keywords as `label(category), ...`, or `None` when empty.
pub fn format_keyword_list(keywords: &[Keyword]) -> Option<String> {
    if keywords.is_empty() {
        return None;
    }
    Some(
        keywords
            .iter()
            .map(|k| format!("{}({})", k.keyword, k.category))
            .collect::<Vec<_>>()
            .join(", "),
    )
}
