// Prompt templates sent to the LLM providers.

use std::str::FromStr;

use crate::conversation::ConversationContext;

/// Scoring rubric variant for the action evaluator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Rubric {
    #[default]
    Standard,
    /// Standard rubric plus a closing question prompting the next action.
    FollowUp,
}

impl FromStr for Rubric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Rubric::Standard),
            "follow-up" | "followup" | "follow_up" => Ok(Rubric::FollowUp),
            other => Err(format!("unknown rubric '{other}'")),
        }
    }
}

const JUDGE_INTRO: &str = r#"You are the AI judge for "Planet Saver" - a game where player actions determine Earth's fate.

Evaluate the environmental impact:

SCORING GUIDE:
+40 to +50: Major positive (renewable energy, veganism, reforestation)
+20 to +40: Good actions (cycling, composting, reducing waste)
+5 to +20: Small positive (recycling, shorter showers, LED bulbs)
-5 to +5: Neutral/minimal impact
-20 to -5: Small negative (occasional meat, short flights)
-40 to -20: Bad actions (SUV purchase, excessive consumption)
-50 to -40: Terrible (deforestation, heavy pollution, coal rolling)

STORY RULES:
- 2-3 sentences maximum
- Be dramatic and educational
- Mention specific impacts (CO2, wildlife, air quality, resources)
- Make consequences feel real
- Include numbers when relevant (tons of CO2, trees saved, etc.)
"#;

const FOLLOW_UP_RULE: &str =
    "- End the story by asking the player what else they can do to help the planet\n";

const JSON_OUTPUT_FORMAT: &str = r#"
OUTPUT FORMAT (JSON only, no markdown, no code blocks):
{
    "score": <number between -50 and +50>,
    "story": "<compelling 2-3 sentence environmental impact story>"
}"#;

/// The fixed system instruction for a rubric.
pub fn rubric_text(rubric: Rubric) -> String {
    let mut text = String::from(JUDGE_INTRO);
    if rubric == Rubric::FollowUp {
        text.push_str(FOLLOW_UP_RULE);
    }
    text.push_str(JSON_OUTPUT_FORMAT);
    text
}

/// Full prompt for scoring one action with the primary provider.
pub fn evaluation_prompt(
    rubric: Rubric,
    username: &str,
    action: &str,
    context: &ConversationContext,
) -> String {
    let mut prompt = rubric_text(rubric);
    prompt.push_str("\n\n");
    if !context.is_empty() {
        prompt.push_str("Previous conversation:\n");
        prompt.push_str(&context.transcript());
        prompt.push('\n');
    }
    prompt.push_str(&format!(
        "Player \"{username}\" action: \"{action}\"\n\nEvaluate this action and respond with JSON only."
    ));
    prompt
}

/// Prompt used against the fallback provider. No scoring bands.
pub fn fallback_evaluation_prompt(username: &str, action: &str) -> String {
    format!(
        r#"You are an environmental impact evaluator for a planet-saving game.

Player "{username}" took this action: "{action}"

Evaluate this action and provide:
1. A score from -50 to +50 (negative = harmful, positive = helpful for the planet)
2. A short story snippet (2-3 sentences) describing the environmental impact

Respond in JSON format:
{{
    "score": <number>,
    "story": "<story text>"
}}"#
    )
}

/// Prompt for the opening narrative of a new session.
pub fn opening_prompt(username: &str) -> String {
    format!(
        r#"Write the opening of an interactive story for a player named "{username}".

Rules:
- Write at least 5 sentences in the second person ("you").
- The year is 2100 and the world has collapsed ecologically.
- Address the player by name, {username}, at least once.
- Weave in what brought the planet here: rising temperatures, rising sea levels, deforestation, industrial agriculture, plastic pollution, ocean acidification, mass extinctions, polluted air and water, and depleted resources. Tell it as a story; do not write a list.
- End with a question asking the reader what they will do to save the world.
- Output plain text only: no markdown, no headings, no labels, no metadata."#
    )
}
