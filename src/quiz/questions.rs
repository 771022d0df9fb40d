//! The fixed question catalog served to the frontend.

use serde::Serialize;

/// One multiple-choice quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: u32,
    pub text: &'static str,
    pub options: [&'static str; 4],
    pub emoji: &'static str,
}

/// All quiz questions, in the order they are asked.
pub static QUESTIONS: [Question; 5] = [
    Question {
        id: 1,
        text: "Pick your favorite tech gadget!",
        options: [
            "Smartphone - Always connected",
            "Laptop - Power and versatility",
            "Smart Watch - Health and efficiency",
            "VR Headset - Immersive experiences",
        ],
        emoji: "📱",
    },
    Question {
        id: 2,
        text: "Choose your favorite color palette!",
        options: [
            "Blue & Purple - Calm and creative",
            "Red & Orange - Bold and energetic",
            "Green & Yellow - Fresh and optimistic",
            "Black & Gold - Elegant and sophisticated",
        ],
        emoji: "🎨",
    },
    Question {
        id: 3,
        text: "Which skill excites you the most?",
        options: [
            "Problem Solving - Finding solutions",
            "Creative Design - Making things beautiful",
            "Communication - Connecting with people",
            "Technical Skills - Building & coding",
        ],
        emoji: "⚡",
    },
    Question {
        id: 4,
        text: "How do you spend your free time?",
        options: [
            "Learning new things",
            "Creating art or content",
            "Hanging out with friends",
            "Gaming or watching movies",
        ],
        emoji: "🎯",
    },
    Question {
        id: 5,
        text: "What's your dream work environment?",
        options: [
            "Startup - Fast-paced and innovative",
            "Creative Studio - Artistic and flexible",
            "Tech Giant - Structured and resourceful",
            "Remote - Freedom and independence",
        ],
        emoji: "🚀",
    },
];

/// The question catalog.
pub fn questions() -> &'static [Question] {
    &QUESTIONS
}
