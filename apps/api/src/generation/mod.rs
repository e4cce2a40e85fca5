// Statement of Purpose generation: LLM first, deterministic template fallback.
// All LLM calls go through llm_client.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod template;
