// Opening narrative for a new player session.

use std::sync::Arc;

use crate::error::LlmResult;
use crate::llm::LlmClient;
use crate::metrics;
use crate::prompts;

#[derive(Clone)]
pub struct OpeningNarrator {
    llm: Arc<dyn LlmClient>,
}

impl OpeningNarrator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// Generate the opening story. Provider errors are returned unchanged.
    pub async fn open(&self, username: &str) -> LlmResult<String> {
        let prompt = prompts::opening_prompt(username);
        let story = self.llm.generate(&prompt).await?;
        metrics::OPENINGS_GENERATED_TOTAL.inc();
        tracing::info!(username, "Opening narrative generated");
        Ok(story.trim().to_string())
    }
}
