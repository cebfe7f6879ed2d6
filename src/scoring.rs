// Extraction of `{score, story}` from free-form model output.
//
// Both evaluators go through `extract_evaluation`, so there is one fence
// heuristic and one fallback policy.

use serde::Serialize;
use serde_json::Value;

use crate::metrics;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Evaluation {
    pub score: i64,
    pub story: String,
}

impl Evaluation {
    pub const SCORE_MIN: i64 = -50;
    pub const SCORE_MAX: i64 = 50;

    /// Zero score with the given text as the story.
    pub fn neutral(story: impl Into<String>) -> Self {
        Self {
            score: 0,
            story: story.into(),
        }
    }
}

/// Remove markdown code fences around a model reply.
///
/// A reply opening with a ```` ```json ```` fence has that tag and every
/// closing fence removed; one opening with a bare fence has every fence
/// removed. Anything else is only trimmed.
pub fn strip_code_fence(raw: &str) -> String {
    let cleaned = raw.trim();
    if cleaned.starts_with("```json") {
        cleaned
            .replace("```json", "")
            .replace("```", "")
            .trim()
            .to_string()
    } else if cleaned.starts_with("```") {
        cleaned.replace("```", "").trim().to_string()
    } else {
        cleaned.to_string()
    }
}

/// Decode a reply into an evaluation without any fallback.
///
/// A missing or non-numeric `score` becomes 0; a missing or non-string
/// `story` becomes the raw reply. Scores are rounded and clamped to
/// `[SCORE_MIN, SCORE_MAX]`.
pub fn parse_evaluation(raw: &str) -> Result<Evaluation, serde_json::Error> {
    let cleaned = strip_code_fence(raw);
    let parsed: serde_json::Map<String, Value> = serde_json::from_str(&cleaned)?;

    let score = parsed.get("score").and_then(score_from_value).unwrap_or(0);
    let story = parsed
        .get("story")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| raw.to_string());

    Ok(Evaluation { score, story })
}

/// Decode a reply, degrading to a zero score with the raw text as the story.
pub fn extract_evaluation(provider: &str, raw: &str) -> Evaluation {
    match parse_evaluation(raw) {
        Ok(evaluation) => evaluation,
        Err(e) => {
            tracing::warn!(provider, error = %e, response = raw, "Model reply was not valid JSON");
            metrics::EVALUATION_PARSE_FALLBACKS_TOTAL
                .with_label_values(&[provider])
                .inc();
            Evaluation::neutral(raw)
        }
    }
}

fn score_from_value(value: &Value) -> Option<i64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if !n.is_finite() {
        return None;
    }
    Some((n.round() as i64).clamp(Evaluation::SCORE_MIN, Evaluation::SCORE_MAX))
}
