// LLM prompt constants for company keyword extraction.

/// System prompt: recruiter persona plus the selection constraints.
pub const COMPANY_KEYWORD_SYSTEM: &str = "당신은 채용 전문가입니다. \
    회사의 인재상 설명을 분석하여 가장 적합한 키워드를 선택하는 역할을 합니다. \
    반드시 제공된 키워드 목록에 있는 ID만 선택하세요. \
    모든 카테고리에서 최소 1개 이상, 전체 5개에서 15개 사이로 선택하세요.";

/// Filled by `fill_template` with `job_description`, `keyword_list` and `ids_only`.
pub const COMPANY_KEYWORD_PROMPT_TEMPLATE: &str = r#"다음은 회사가 찾고 있는 인재상에 대한 설명입니다:
"{job_description}"

아래 키워드 목록에서 위 설명과 가장 관련성이 높은 키워드를 선택해주세요.
각 카테고리별로 최소 1개 이상 선택하되, 전체적으로 5-15개 사이로 선택해주세요.

사용 가능한 키워드 ([ID] 키워드 (카테고리)):
{keyword_list}

{ids_only}
예시: [1, 5, 8, 12, 15]"#;
