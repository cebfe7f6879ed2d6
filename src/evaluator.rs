// Action evaluator: prompt, one provider call, extraction, context update.

use std::sync::Arc;

use crate::conversation::ConversationContext;
use crate::error::LlmResult;
use crate::fallback::FallbackEvaluator;
use crate::llm::LlmClient;
use crate::metrics;
use crate::prompts::{self, Rubric};
use crate::scoring::{extract_evaluation, Evaluation};

/// Result of scoring one action.
#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub evaluation: Evaluation,
    /// Incoming context with this action and its story appended.
    pub context: ConversationContext,
}

#[derive(Clone)]
pub struct ActionEvaluator {
    llm: Arc<dyn LlmClient>,
    rubric: Rubric,
    fallback: Option<FallbackEvaluator>,
}

impl ActionEvaluator {
    pub fn new(llm: Arc<dyn LlmClient>, rubric: Rubric) -> Self {
        Self {
            llm,
            rubric,
            fallback: None,
        }
    }

    /// Degrade to `fallback` when the primary provider fails.
    pub fn with_fallback(mut self, fallback: FallbackEvaluator) -> Self {
        self.fallback = Some(fallback);
        self
    }

    pub async fn evaluate(
        &self,
        username: &str,
        action: &str,
        mut context: ConversationContext,
    ) -> LlmResult<ActionOutcome> {
        let prompt = prompts::evaluation_prompt(self.rubric, username, action, &context);

        let evaluation = match self.llm.generate(&prompt).await {
            Ok(reply) => extract_evaluation(self.llm.provider(), &reply),
            Err(e) => match &self.fallback {
                Some(fallback) => {
                    tracing::warn!(
                        primary = self.llm.provider(),
                        fallback = fallback.provider(),
                        "Primary provider failed ({e}), using fallback"
                    );
                    fallback.evaluate(username, action).await
                }
                None => return Err(e),
            },
        };

        metrics::ACTIONS_EVALUATED_TOTAL.inc();
        metrics::ACTION_SCORE.observe(evaluation.score as f64);
        tracing::info!(username, score = evaluation.score, turns = context.len() + 2, "Action evaluated");

        context.record_exchange(action, evaluation.story.clone());
        Ok(ActionOutcome {
            evaluation,
            context,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::ConversationTurn;
    use crate::error::LlmError;
    use crate::llm::stub::StubClient;

    fn missing_key() -> LlmError {
        LlmError::MissingCredential {
            provider: "stub",
            variable: "GEMINI_API_KEY".into(),
        }
    }

    #[tokio::test]
    async fn test_fresh_context_gets_two_turns() {
        let stub = Arc::new(StubClient::replying(r#"{"score": 45, "story": "Solar farms bloom."}"#));
        let evaluator = ActionEvaluator::new(stub.clone(), Rubric::Standard);

        let outcome = evaluator
            .evaluate("ada", "install solar", ConversationContext::new())
            .await
            .unwrap();

        assert_eq!(outcome.evaluation.score, 45);
        assert_eq!(
            outcome.context.turns(),
            &[
                ConversationTurn::user("install solar"),
                ConversationTurn::assistant("Solar farms bloom."),
            ]
        );
        assert_eq!(stub.calls(), 1);
    }

    #[tokio::test]
    async fn test_existing_context_is_preserved_and_extended() {
        let prior = ConversationContext::from(vec![
            ConversationTurn::user("compost"),
            ConversationTurn::assistant("Worms rejoice."),
            ConversationTurn::user("buy an SUV"),
            ConversationTurn::assistant("Exhaust fills the street."),
        ]);
        let stub = Arc::new(StubClient::replying("not json"));
        let evaluator = ActionEvaluator::new(stub.clone(), Rubric::Standard);

        let outcome = evaluator
            .evaluate("ada", "sell the SUV", prior.clone())
            .await
            .unwrap();

        assert_eq!(outcome.context.len(), prior.len() + 2);
        assert_eq!(&outcome.context.turns()[..4], prior.turns());
        assert_eq!(outcome.context.turns()[5], ConversationTurn::assistant("not json"));
        assert_eq!(outcome.evaluation, Evaluation::neutral("not json"));

        let prompt = stub.last_prompt().unwrap();
        assert!(prompt.contains("user: buy an SUV\n"));
        assert!(prompt.contains("Player \"ada\" action: \"sell the SUV\""));
    }

    #[tokio::test]
    async fn test_rubric_variant_reaches_prompt() {
        let stub = Arc::new(StubClient::replying("{}"));
        ActionEvaluator::new(stub.clone(), Rubric::FollowUp)
            .evaluate("ada", "x", ConversationContext::new())
            .await
            .unwrap();
        assert!(stub.last_prompt().unwrap().contains("what else they can do"));
    }

    #[tokio::test]
    async fn test_primary_error_without_fallback_propagates() {
        let stub = Arc::new(StubClient::failing(missing_key));
        let err = ActionEvaluator::new(stub, Rubric::Standard)
            .evaluate("ada", "x", ConversationContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingCredential { .. }));
    }

    #[tokio::test]
    async fn test_primary_error_uses_fallback() {
        let primary = Arc::new(StubClient::failing(missing_key));
        let secondary = Arc::new(StubClient::replying(r#"{"score": 20, "story": "Backup story."}"#));
        let evaluator = ActionEvaluator::new(primary.clone(), Rubric::Standard)
            .with_fallback(FallbackEvaluator::new(secondary.clone()));

        let outcome = evaluator
            .evaluate("ada", "cycle", ConversationContext::new())
            .await
            .unwrap();

        assert_eq!(primary.calls(), 1);
        assert_eq!(secondary.calls(), 1);
        assert_eq!(outcome.evaluation.score, 20);
        assert_eq!(outcome.context.turns()[1], ConversationTurn::assistant("Backup story."));
    }

    #[tokio::test]
    async fn test_fallback_unused_when_primary_succeeds() {
        let primary = Arc::new(StubClient::replying(r#"{"score": 1, "story": "ok"}"#));
        let secondary = Arc::new(StubClient::replying("unused"));
        ActionEvaluator::new(primary, Rubric::Standard)
            .with_fallback(FallbackEvaluator::new(secondary.clone()))
            .evaluate("ada", "x", ConversationContext::new())
            .await
            .unwrap();
        assert_eq!(secondary.calls(), 0);
    }
}
