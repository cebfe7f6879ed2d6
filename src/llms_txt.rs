// LLM-friendly documentation endpoint content.

pub const LLMS_TXT: &str = r#"# Planet Saver API
> Backend for a browser game where each player action is scored for its environmental impact and answered with a short story.

## Sessions
The server keeps no session state. Every response to /api/submit-action echoes the full conversation as `previouscontext`; send it back unchanged with the next action.

## Endpoints
- POST /first-message - body `{"username"}` -> `{"story"}` opening narrative for a new session
- POST /api/submit-action - body `{"username", "action", "previouscontext"?}` -> `{"score", "story", "username", "action", "previouscontext"}`
- GET /api/test - fixed probe payload
- GET /health - service status
- GET /metrics - Prometheus metrics

## Scores
Integers from -50 (terrible for the planet) to +50 (major positive). A reply the model could not format is scored 0 and its text is returned as the story.

## Conversation turns
`{"role": "user" | "assistant", "content": "..."}`, oldest first. Each action appends one user turn and one assistant turn.
"#;
