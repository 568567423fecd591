// Profile tagging against the keyword catalog.
// Companies: LLM-selected ids. Job seekers: deterministic substring rules.

pub mod company;
pub mod handlers;
pub mod jobseeker;
pub mod prompts;

use crate::models::Keyword;

/// Catalog rows whose id is in `ids`, in catalog order.
pub fn select_from_catalog(catalog: &[Keyword], ids: &[i64]) -> Vec<Keyword> {
    catalog
        .iter()
        .filter(|k| ids.contains(&k.id))
        .cloned()
        .collect()
}
