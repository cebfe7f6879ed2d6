// Caller-held conversation history, echoed back on every response.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One turn as the caller sent it. The object is kept exactly as received,
/// including unknown keys, so the turn round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationTurn(Map<String, Value>);

impl ConversationTurn {
    fn new(role: Role, content: String) -> Self {
        let mut fields = Map::new();
        fields.insert("role".to_string(), Value::String(role.as_str().to_string()));
        fields.insert("content".to_string(), Value::String(content));
        Self(fields)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into())
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Role as shown in the prompt; a missing role reads as `user`.
    pub fn role_label(&self) -> String {
        match self.0.get("role") {
            None | Some(Value::Null) => Role::default().to_string(),
            Some(value) => render(value),
        }
    }

    /// Content as shown in the prompt; missing or null reads as empty.
    pub fn content_text(&self) -> String {
        match self.0.get("content") {
            None | Some(Value::Null) => String::new(),
            Some(value) => render(value),
        }
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Ordered turns for one player session. Turns are only ever appended.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationContext(Vec<ConversationTurn>);

impl ConversationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.0
    }

    /// Append the player's action followed by the resulting story.
    pub fn record_exchange(&mut self, action: impl Into<String>, story: impl Into<String>) {
        self.0.push(ConversationTurn::user(action));
        self.0.push(ConversationTurn::assistant(story));
    }

    /// One `role: content` line per turn.
    pub fn transcript(&self) -> String {
        let mut out = String::new();
        for turn in &self.0 {
            let _ = writeln!(out, "{}: {}", turn.role_label(), turn.content_text());
        }
        out
    }
}

impl From<Vec<ConversationTurn>> for ConversationContext {
    fn from(turns: Vec<ConversationTurn>) -> Self {
        Self(turns)
    }
}
