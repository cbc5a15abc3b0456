// LLM-backed résumé analysis: prompts, response schemas, orchestration, handlers.
// All model calls go through llm_client::LlmProvider.

pub mod handlers;
pub mod models;
pub mod prompts;
pub mod service;
