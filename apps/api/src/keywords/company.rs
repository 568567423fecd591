//! LLM-assisted keyword selection for company hiring descriptions.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::keywords::prompts::{COMPANY_KEYWORD_PROMPT_TEMPLATE, COMPANY_KEYWORD_SYSTEM};
use crate::llm_client::prompts::{fill_template, IDS_ONLY_INSTRUCTION};
use crate::llm_client::{CompletionProvider, CompletionRequest, LlmError};
use crate::models::Keyword;

const TEMPERATURE: f32 = 0.3;

/// First bracketed list of integers in the response.
static ID_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[\d,\s]+\]").expect("ID list pattern is valid"));

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("completion failed: {0}")]
    Llm(#[from] LlmError),

    #[error("no keyword id list in response")]
    NoIdList,

    #[error("malformed keyword id list: {0}")]
    MalformedIds(#[from] serde_json::Error),
}

pub fn build_prompt(job_description: &str, catalog: &[Keyword]) -> String {
    let keyword_list = catalog
        .iter()
        .map(|k| format!("- [{}] {} ({})", k.id, k.keyword, k.category))
        .collect::<Vec<_>>()
        .join("\n");

    fill_template(
        COMPANY_KEYWORD_PROMPT_TEMPLATE,
        &[
            ("job_description", job_description),
            ("keyword_list", keyword_list.as_str()),
            ("ids_only", IDS_ONLY_INSTRUCTION),
        ],
    )
}

/// Parses the first `[1, 2, 3]`-shaped list found anywhere in `response`.
pub fn parse_keyword_ids(response: &str) -> Result<Vec<i64>, ExtractionError> {
    let list = ID_LIST.find(response).ok_or(ExtractionError::NoIdList)?;
    Ok(serde_json::from_str(list.as_str())?)
}

/// Drops ids absent from the catalog and repeated ids, keeping first-seen order.
pub fn retain_catalog_ids(ids: &[i64], catalog: &[Keyword]) -> Vec<i64> {
    let mut kept: Vec<i64> = Vec::with_capacity(ids.len());
    for &id in ids {
        if catalog.iter().any(|k| k.id == id) && !kept.contains(&id) {
            kept.push(id);
        }
    }
    kept
}

/// Asks the completion provider for keyword ids; the result is always a subset of `catalog`.
pub async fn extract_company_keywords(
    llm: &dyn CompletionProvider,
    job_description: &str,
    catalog: &[Keyword],
) -> Result<Vec<i64>, ExtractionError> {
    let prompt = build_prompt(job_description, catalog);
    let response = llm
        .complete(CompletionRequest {
            system: COMPANY_KEYWORD_SYSTEM,
            prompt: &prompt,
            temperature: TEMPERATURE,
        })
        .await?;

    let ids = parse_keyword_ids(&response)?;
    Ok(retain_catalog_ids(&ids, catalog))
}
