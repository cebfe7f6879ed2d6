// Scripted provider for unit tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::LlmClient;
use crate::error::{LlmError, LlmResult};

enum Reply {
    Text(String),
    Fail(fn() -> LlmError),
}

/// Returns a fixed reply (or error) and records every prompt it receives.
pub struct StubClient {
    reply: Reply,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl StubClient {
    pub fn replying(text: &str) -> Self {
        Self::with(Reply::Text(text.to_string()))
    }

    pub fn failing(err: fn() -> LlmError) -> Self {
        Self::with(Reply::Fail(err))
    }

    fn with(reply: Reply) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl LlmClient for StubClient {
    fn provider(&self) -> &'static str {
        "stub"
    }

    async fn generate(&self, prompt: &str) -> LlmResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(err) => Err(err()),
        }
    }
}
