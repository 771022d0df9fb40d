//! LLM provider trait and types.

use async_trait::async_trait;

use crate::error::LlmError;

/// Sampling parameters for a single generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// Parameters used for personality analysis.
    pub const PERSONALITY: Self = Self {
        temperature: 0.9,
        top_k: 40,
        top_p: 0.95,
        max_output_tokens: 1024,
    };
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::PERSONALITY
    }
}

/// Request for a single-turn text completion.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub prompt: String,
    pub generation: GenerationConfig,
}

impl CompletionRequest {
    /// Create a new completion request with default generation parameters.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            generation: GenerationConfig::default(),
        }
    }

    /// Set generation parameters.
    pub fn with_generation(mut self, generation: GenerationConfig) -> Self {
        self.generation = generation;
        self
    }
}

/// Response from a text completion.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Raw model text, untrimmed.
    pub content: String,
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub finish_reason: FinishReason,
}

/// Why the completion finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Stop,
    Length,
    Safety,
    Unknown,
}

impl FinishReason {
    /// Map a Gemini `finishReason` string.
    pub fn from_gemini(reason: Option<&str>) -> Self {
        match reason {
            Some("STOP") => Self::Stop,
            Some("MAX_TOKENS") => Self::Length,
            Some("SAFETY") | Some("RECITATION") | Some("BLOCKLIST") | Some("PROHIBITED_CONTENT") => {
                Self::Safety
            }
            _ => Self::Unknown,
        }
    }
}

/// Trait for LLM providers.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Get the model name.
    fn model_name(&self) -> &str;

    /// Generate text for a single prompt.
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personality_generation_parameters() {
        let cfg = GenerationConfig::PERSONALITY;
        assert_eq!(cfg.temperature, 0.9);
        assert_eq!(cfg.top_k, 40);
        assert_eq!(cfg.top_p, 0.95);
        assert_eq!(cfg.max_output_tokens, 1024);
        assert_eq!(CompletionRequest::new("hi").generation, cfg);
    }

    #[test]
    fn finish_reason_mapping() {
        assert_eq!(FinishReason::from_gemini(Some("STOP")), FinishReason::Stop);
        assert_eq!(
            FinishReason::from_gemini(Some("MAX_TOKENS")),
            FinishReason::Length
        );
        assert_eq!(
            FinishReason::from_gemini(Some("SAFETY")),
            FinishReason::Safety
        );
        assert_eq!(FinishReason::from_gemini(None), FinishReason::Unknown);
    }
}
