pub mod api;
pub mod config;
pub mod conversation;
pub mod error;
pub mod evaluator;
pub mod fallback;
pub mod llm;
pub mod llms_txt;
pub mod metrics;
pub mod narrative;
pub mod prompts;
pub mod scoring;
