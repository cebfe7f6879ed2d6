// OpenRouter chat-completions client (fallback provider).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{instrumented, request_error, LlmClient};
use crate::config::OPENROUTER_API_KEY_VAR;
use crate::error::{LlmError, LlmResult};

const PROVIDER: &str = "openrouter";

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
}

impl ChatCompletionResponse {
    /// Content of the first returned message.
    pub fn content(self) -> LlmResult<String> {
        let choice = self.choices.into_iter().next().ok_or_else(|| LlmError::Decode {
            provider: PROVIDER,
            message: "no choices in response".to_string(),
        })?;
        choice
            .message
            .content
            .ok_or(LlmError::EmptyResponse { provider: PROVIDER })
    }
}

/// Client for the OpenRouter chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl OpenRouterClient {
    /// Create a client. The key is captured here for the client's lifetime.
    pub fn new(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> LlmResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| request_error(PROVIDER, e))?;
        Ok(Self {
            client,
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn request_for(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Some(prompt.to_string()),
            }],
        }
    }

    async fn call(&self, prompt: &str) -> LlmResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::MissingCredential {
                provider: PROVIDER,
                variable: OPENROUTER_API_KEY_VAR.to_string(),
            })?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&self.request_for(prompt))
            .send()
            .await
            .map_err(|e| request_error(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Http {
                provider: PROVIDER,
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| LlmError::Decode {
                provider: PROVIDER,
                message: e.to_string(),
            })?
            .content()
    }
}

#[async_trait]
impl LlmClient for OpenRouterClient {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        instrumented(PROVIDER, self.call(prompt)).await
    }
}
