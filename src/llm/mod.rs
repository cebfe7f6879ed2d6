// Remote LLM provider clients.

pub mod gemini;
pub mod openrouter;
#[cfg(test)]
pub(crate) mod stub;

use async_trait::async_trait;
use std::time::Instant;

use crate::error::{LlmError, LlmResult};
use crate::metrics;

pub use gemini::GeminiClient;
pub use openrouter::OpenRouterClient;

/// A remote text-completion service: one prompt in, one block of text out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Provider name used in logs, metrics and error messages.
    fn provider(&self) -> &'static str;

    /// Send a single prompt and return the model's text.
    async fn generate(&self, prompt: &str) -> LlmResult<String>;
}

/// Where an API key comes from.
#[derive(Debug, Clone)]
pub enum ApiKeySource {
    /// Read the named environment variable every time the key is needed.
    Env(String),
    /// A key supplied directly.
    Fixed(String),
}

impl ApiKeySource {
    /// Resolve the key, treating an empty value as missing.
    pub fn resolve(&self, provider: &'static str) -> LlmResult<String> {
        let (value, variable) = match self {
            ApiKeySource::Env(var) => (std::env::var(var).ok(), var.as_str()),
            ApiKeySource::Fixed(key) => (Some(key.clone()), "api key"),
        };
        value
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LlmError::MissingCredential {
                provider,
                variable: variable.to_string(),
            })
    }
}

/// Run a provider call and record its outcome and latency.
pub(crate) async fn instrumented<F>(provider: &'static str, call: F) -> LlmResult<String>
where
    F: std::future::Future<Output = LlmResult<String>>,
{
    let start = Instant::now();
    let result = call.await;
    let outcome = match &result {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    metrics::LLM_REQUESTS_TOTAL
        .with_label_values(&[provider, outcome])
        .inc();
    metrics::LLM_REQUEST_DURATION_SECONDS
        .with_label_values(&[provider])
        .observe(start.elapsed().as_secs_f64());
    if let Err(e) = &result {
        tracing::warn!(provider, kind = e.kind(), "LLM call failed: {e}");
    }
    result
}

/// Map a reqwest send failure to an `LlmError`.
pub(crate) fn request_error(provider: &'static str, e: reqwest::Error) -> LlmError {
    let message = if e.is_timeout() {
        format!("timed out: {e}")
    } else {
        e.to_string()
    };
    LlmError::Request { provider, message }
}
