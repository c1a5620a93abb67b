// AI service: `/ai/improve` and `/ai/ats`, answered in-process through the LLM client.
// The same implementation also serves the pipeline directly when no remote AI is configured.

pub mod handlers;
pub mod prompts;
pub mod service;

pub use service::LlmAi;
