//! Quiz content and personality analysis.

pub mod analyzer;
pub mod profile;
pub mod prompt;
pub mod questions;

pub use analyzer::{Analysis, FallbackReason, ProfileAnalyzer, ProfileSource, ValidationError};
pub use profile::{FALLBACK_PROFILES, PersonalityProfile, fallback_profile};
pub use questions::{QUESTIONS, Question, questions};
