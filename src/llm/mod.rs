//! LLM integration for personality analysis.
//!
//! Only Google Gemini is supported. When no credential is configured there is
//! no provider at all and the analyzer runs in fallback-only mode.

mod gemini;
mod provider;

pub use gemini::GeminiProvider;
pub use provider::{
    CompletionRequest, CompletionResponse, FinishReason, GenerationConfig, LlmProvider,
};

use std::sync::Arc;

use crate::config::LlmConfig;
use crate::error::LlmError;

/// Create an LLM provider based on configuration.
///
/// Returns `Ok(None)` when no API key is set.
pub fn create_llm_provider(config: &LlmConfig) -> Result<Option<Arc<dyn LlmProvider>>, LlmError> {
    let Some(gemini) = config.gemini.as_ref() else {
        tracing::warn!("GEMINI_API_KEY not set; serving fallback personalities only");
        return Ok(None);
    };

    let provider = GeminiProvider::new(gemini.clone())?;
    tracing::info!(
        model = %gemini.model,
        timeout_secs = gemini.timeout.as_secs(),
        "Gemini API key loaded"
    );
    Ok(Some(Arc::new(provider)))
}
