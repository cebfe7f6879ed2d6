// Scoring against the secondary provider. Never fails.

use std::sync::Arc;

use crate::llm::LlmClient;
use crate::metrics;
use crate::prompts;
use crate::scoring::{extract_evaluation, Evaluation};

#[derive(Clone)]
pub struct FallbackEvaluator {
    llm: Arc<dyn LlmClient>,
}

impl FallbackEvaluator {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub fn provider(&self) -> &'static str {
        self.llm.provider()
    }

    /// Score an action. Provider failures become a zero score whose story
    /// carries the error message.
    pub async fn evaluate(&self, username: &str, action: &str) -> Evaluation {
        metrics::FALLBACK_EVALUATIONS_TOTAL.inc();
        let prompt = prompts::fallback_evaluation_prompt(username, action);
        match self.llm.generate(&prompt).await {
            Ok(content) => extract_evaluation(self.llm.provider(), &content),
            Err(e) => {
                tracing::error!(provider = self.llm.provider(), "Error calling fallback provider: {e}");
                Evaluation::neutral(format!("Error evaluating action: {e}"))
            }
        }
    }
}
