//! Personality profiles and the deterministic fallback table.

use serde::{Deserialize, Serialize};

/// The result returned to the user after the quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalityProfile {
    #[serde(rename = "type")]
    pub personality_type: String,
    pub message: String,
    pub traits: Vec<String>,
    /// Hex color code, e.g. `#667eea`.
    pub color: String,
}

/// A compile-time profile. Converted to [`PersonalityProfile`] on use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticProfile {
    pub personality_type: &'static str,
    pub message: &'static str,
    pub traits: [&'static str; 4],
    pub color: &'static str,
}

impl From<&StaticProfile> for PersonalityProfile {
    fn from(p: &StaticProfile) -> Self {
        Self {
            personality_type: p.personality_type.to_string(),
            message: p.message.to_string(),
            traits: p.traits.iter().map(|t| t.to_string()).collect(),
            color: p.color.to_string(),
        }
    }
}

/// Canned profiles used whenever the model is unavailable or misbehaves.
pub static FALLBACK_PROFILES: [StaticProfile; 3] = [
    StaticProfile {
        personality_type: "The Innovative Dreamer",
        message: "This is my message for you: Your creative spirit and love for technology make you a natural innovator. Keep dreaming big and turning those dreams into reality!",
        traits: [
            "Highly creative and imaginative",
            "Tech-savvy problem solver",
            "Embraces new possibilities",
            "Inspires others with ideas",
        ],
        color: "#667eea",
    },
    StaticProfile {
        personality_type: "The Bold Trailblazer",
        message: "This is my message for you: Your energy and confidence are your superpowers! Don't be afraid to take the lead and show the world what you're made of.",
        traits: [
            "Passionate and driven",
            "Goal-oriented achiever",
            "Natural leader",
            "Takes initiative fearlessly",
        ],
        color: "#f5576c",
    },
    StaticProfile {
        personality_type: "The Thoughtful Builder",
        message: "This is my message for you: Your attention to detail and methodical approach will help you build amazing things. Trust your process and keep creating!",
        traits: [
            "Systematic and organized",
            "Analytical thinker",
            "Loves deep learning",
            "Excellent problem solver",
        ],
        color: "#4ade80",
    },
];

/// Index into [`FALLBACK_PROFILES`] for a set of answers.
///
/// Character count (not byte count) of all answers joined with no separator,
/// modulo the table size.
pub fn fallback_index(answers: &[String]) -> usize {
    let chars: usize = answers.iter().map(|a| a.chars().count()).sum();
    chars % FALLBACK_PROFILES.len()
}

/// Pick the fallback profile for a set of answers.
pub fn fallback_profile(answers: &[String]) -> PersonalityProfile {
    PersonalityProfile::from(&FALLBACK_PROFILES[fallback_index(answers)])
}
