//! Google Gemini provider.
//!
//! Talks to the `generateContent` endpoint of the Generative Language API
//! directly over `reqwest`. One prompt in, the first candidate's text out.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::GeminiConfig;
use crate::error::LlmError;
use crate::llm::provider::{
    CompletionRequest, CompletionResponse, FinishReason, GenerationConfig, LlmProvider,
};
use crate::util::truncate_for_log;

/// Provider name constant to avoid magic strings.
const PROVIDER_NAME: &str = "gemini";

/// Gemini `generateContent` provider.
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// The configured timeout bounds every request end to end.
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::RequestFailed {
                provider: PROVIDER_NAME.to_string(),
                reason: format!("Failed to build reqwest client: {}", e),
            })?;

        Ok(Self { client, config })
    }

    /// `{base}/v1beta/models/{model}:generateContent`
    fn api_url(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!(
            "{}/v1beta/models/{}:generateContent",
            base, self.config.model
        )
    }

    fn map_send_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout {
                provider: PROVIDER_NAME.to_string(),
                timeout: self.config.timeout,
            }
        } else {
            LlmError::RequestFailed {
                provider: PROVIDER_NAME.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
    max_output_tokens: u32,
}

impl From<GenerationConfig> for GeminiGenerationConfig {
    fn from(cfg: GenerationConfig) -> Self {
        Self {
            temperature: cfg.temperature,
            top_k: cfg.top_k,
            top_p: cfg.top_p,
            max_output_tokens: cfg.max_output_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiCandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate.
    fn into_completion(self) -> Result<CompletionResponse, LlmError> {
        let block_reason = self
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "none".to_string());

        let candidate =
            self.candidates
                .into_iter()
                .next()
                .ok_or_else(|| LlmError::InvalidResponse {
                    provider: PROVIDER_NAME.to_string(),
                    reason: format!("no candidates returned (block reason: {block_reason})"),
                })?;

        let content: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        let finish_reason = FinishReason::from_gemini(candidate.finish_reason.as_deref());

        if content.is_empty() {
            return Err(LlmError::InvalidResponse {
                provider: PROVIDER_NAME.to_string(),
                reason: format!("candidate has no text (finish reason: {finish_reason:?})"),
            });
        }

        let (input_tokens, output_tokens) = self
            .usage_metadata
            .map(|u| (u.prompt_token_count, u.candidates_token_count))
            .unwrap_or((0, 0));

        Ok(CompletionResponse {
            content,
            input_tokens,
            output_tokens,
            finish_reason,
        })
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, req: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let url = self.api_url();
        let body = GenerateContentRequest {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart { text: &req.prompt }],
            }],
            generation_config: req.generation.into(),
        };

        tracing::debug!(model = %self.config.model, "Sending request to Gemini");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.config.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(LlmError::AuthFailed {
                provider: PROVIDER_NAME.to_string(),
            });
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(std::time::Duration::from_secs);
            return Err(LlmError::RateLimited {
                provider: PROVIDER_NAME.to_string(),
                retry_after,
            });
        }

        let response_text = response.text().await.map_err(|e| self.map_send_error(e))?;

        tracing::debug!(%status, "Gemini response received");

        if !status.is_success() {
            return Err(LlmError::RequestFailed {
                provider: PROVIDER_NAME.to_string(),
                reason: format!("HTTP {}: {}", status, truncate_for_log(&response_text, 200)),
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_str(&response_text).map_err(|e| LlmError::InvalidResponse {
                provider: PROVIDER_NAME.to_string(),
                reason: format!(
                    "JSON parse error: {}. Raw: {}",
                    e,
                    truncate_for_log(&response_text, 200)
                ),
            })?;

        parsed.into_completion()
    }
}
