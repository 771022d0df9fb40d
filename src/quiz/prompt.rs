//! Prompt construction for personality analysis.

/// Every generated `message` must start with this phrase.
pub const MESSAGE_LEAD_IN: &str = "This is my message for you:";

/// Colors the model is allowed to choose from.
pub const COLOR_PALETTE: [&str; 6] = [
    "#667eea", "#f5576c", "#4ade80", "#fbbf24", "#8b5cf6", "#ec4899",
];

/// Render answers as a 1-based numbered list, one per line.
fn numbered_answers(answers: &[String]) -> String {
    answers
        .iter()
        .enumerate()
        .map(|(i, answer)| format!("{}. {}", i + 1, answer))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the prompt asking the model for a JSON personality profile.
pub fn build_personality_prompt(answers: &[String]) -> String {
    format!(
        r##"You are a creative personality analyst. Based on these personality test answers, create a fun and engaging personality profile:

Answers:
{answers}

You MUST respond with ONLY a valid JSON object in this exact format:
{{
  "type": "A creative personality type name (e.g., The Innovative Dreamer, The Bold Visionary)",
  "message": "An inspiring 2-3 sentence message that starts with '{lead_in}' and feels warm and personal",
  "traits": [
    "First key personality trait (be specific and descriptive)",
    "Second key personality trait",
    "Third key personality trait",
    "Fourth key personality trait"
  ],
  "color": "#hexcolor (choose from: {palette})"
}}

Requirements:
- Make it fun, positive, and memorable
- Personalize based on the answers provided
- Use NO emojis in traits or message
- Return ONLY valid JSON, nothing else
- Be creative with the personality type name

JSON Response:"##,
        answers = numbered_answers(answers),
        lead_in = MESSAGE_LEAD_IN,
        palette = COLOR_PALETTE.join(", "),
    )
}
