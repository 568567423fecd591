// Cover-letter generation for a job seeker applying to a company.
// All LLM calls go through llm_client::CompletionProvider.

pub mod cover_letter;
pub mod handlers;
pub mod prompts;
