//! Turns quiz answers into a personality profile.
//!
//! The model is asked for a JSON object, but its output is treated as
//! untrusted text: it is cleaned, the outermost `{...}` span is cut out,
//! parsed and checked field by field. Any failure along the way, including
//! the model call itself, produces a fallback profile instead of an error.
//! The only error a caller can see is [`AnalysisError::EmptyInput`].

use std::sync::Arc;
use std::time::Instant;

use serde_json::{Map, Value};

use crate::error::AnalysisError;
use crate::llm::{CompletionRequest, GenerationConfig, LlmProvider};
use crate::quiz::profile::{PersonalityProfile, fallback_profile};
use crate::quiz::prompt::build_personality_prompt;
use crate::util::truncate_for_log;

/// Fields every model response must carry.
pub const REQUIRED_FIELDS: [&str; 4] = ["type", "message", "traits", "color"];

/// Why a model response was rejected.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("JSON syntax error: {0}")]
    Syntax(#[from] serde_json::Error),

    #[error("response JSON is not an object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("`traits` must be an array")]
    TraitsNotArray,

    #[error("field `{0}` has the wrong type")]
    WrongType(&'static str),

    #[error("field `{0}` is empty")]
    EmptyField(&'static str),
}

/// Strip surrounding whitespace and markdown code-fence markers.
pub fn clean_response(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Slice from the first `{` to the last `}`, inclusive.
pub fn extract_json_object(text: &str) -> Result<&str, ValidationError> {
    let start = text.find('{').ok_or(ValidationError::NoJsonObject)?;
    let end = text.rfind('}').ok_or(ValidationError::NoJsonObject)?;
    if end < start {
        return Err(ValidationError::NoJsonObject);
    }
    Ok(&text[start..=end])
}

fn string_field(
    obj: &Map<String, Value>,
    field: &'static str,
) -> Result<String, ValidationError> {
    let value = obj
        .get(field)
        .and_then(Value::as_str)
        .ok_or(ValidationError::WrongType(field))?;
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(value.to_string())
}

/// Parse an extracted JSON span into a profile, checking every field.
pub fn parse_profile(json: &str) -> Result<PersonalityProfile, ValidationError> {
    let value: Value = serde_json::from_str(json)?;
    let obj = value.as_object().ok_or(ValidationError::NotAnObject)?;

    if let Some(missing) = REQUIRED_FIELDS.iter().find(|f| !obj.contains_key(**f)) {
        return Err(ValidationError::MissingField(*missing));
    }

    let traits = obj
        .get("traits")
        .and_then(Value::as_array)
        .ok_or(ValidationError::TraitsNotArray)?;
    let traits = traits
        .iter()
        .map(|t| t.as_str().map(String::from))
        .collect::<Option<Vec<_>>>()
        .ok_or(ValidationError::WrongType("traits"))?;
    if traits.is_empty() || traits.iter().any(|t| t.trim().is_empty()) {
        return Err(ValidationError::EmptyField("traits"));
    }

    Ok(PersonalityProfile {
        personality_type: string_field(obj, "type")?,
        message: string_field(obj, "message")?,
        traits,
        color: string_field(obj, "color")?,
    })
}

/// Full pipeline from raw model text to a validated profile.
pub fn validate_response(raw: &str) -> Result<PersonalityProfile, ValidationError> {
    let cleaned = clean_response(raw);
    let json = extract_json_object(&cleaned)?;
    parse_profile(json)
}

/// Why a fallback profile was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No model credential configured.
    NoProvider,
    /// The model call itself failed.
    ProviderFailed,
    /// The model answered, but not with a usable profile.
    InvalidResponse,
}

/// Where a profile came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSource {
    Model,
    Fallback(FallbackReason),
}

/// Result of a successful analysis.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub profile: PersonalityProfile,
    pub source: ProfileSource,
}

/// Personality analysis service shared by all requests.
pub struct ProfileAnalyzer {
    llm: Option<Arc<dyn LlmProvider>>,
    generation: GenerationConfig,
}

impl ProfileAnalyzer {
    /// Create an analyzer. `None` means fallback-only mode.
    pub fn new(llm: Option<Arc<dyn LlmProvider>>) -> Self {
        Self {
            llm,
            generation: GenerationConfig::PERSONALITY,
        }
    }

    /// Analyzer that never calls a model.
    pub fn fallback_only() -> Self {
        Self::new(None)
    }

    /// Whether a model is configured.
    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// Analyze a set of quiz answers.
    ///
    /// Fails only for empty input. Every other problem yields a fallback
    /// profile chosen by [`fallback_profile`].
    pub async fn analyze(&self, answers: &[String]) -> Result<Analysis, AnalysisError> {
        if answers.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let Some(llm) = self.llm.as_ref() else {
            tracing::debug!("No model configured, using fallback");
            return Ok(Self::fallback(answers, FallbackReason::NoProvider));
        };

        let request =
            CompletionRequest::new(build_personality_prompt(answers)).with_generation(self.generation);

        let started = Instant::now();
        let response = match llm.complete(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    provider = llm.name(),
                    model = llm.model_name(),
                    error = %e,
                    "Personality analysis call failed, using fallback"
                );
                return Ok(Self::fallback(answers, FallbackReason::ProviderFailed));
            }
        };

        tracing::debug!(
            provider = llm.name(),
            duration_ms = started.elapsed().as_millis() as u64,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            finish_reason = ?response.finish_reason,
            "Model response: {}",
            truncate_for_log(&response.content, 500)
        );

        match validate_response(&response.content) {
            Ok(profile) => {
                tracing::info!(
                    personality_type = %profile.personality_type,
                    "Parsed personality from model response"
                );
                Ok(Analysis {
                    profile,
                    source: ProfileSource::Model,
                })
            }
            Err(e) => {
                tracing::warn!(error = %e, "Unusable model response, using fallback");
                Ok(Self::fallback(answers, FallbackReason::InvalidResponse))
            }
        }
    }

    fn fallback(answers: &[String], reason: FallbackReason) -> Analysis {
        Analysis {
            profile: fallback_profile(answers),
            source: ProfileSource::Fallback(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use tokio::sync::Mutex;

    use super::*;
    use crate::error::LlmError;
    use crate::llm::{CompletionResponse, FinishReason};
    use crate::quiz::profile::FALLBACK_PROFILES;

    /// Provider that replays a fixed reply and records prompts.
    struct ScriptedLlm {
        reply: Option<String>,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedLlm {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(text.to_string()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                requests: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for ScriptedLlm {
        fn name(&self) -> &str {
            "scripted"
        }

        fn model_name(&self) -> &str {
            "scripted-model"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().await.push(request);
            match &self.reply {
                Some(text) => Ok(CompletionResponse {
                    content: text.clone(),
                    input_tokens: 10,
                    output_tokens: 20,
                    finish_reason: FinishReason::Stop,
                }),
                None => Err(LlmError::RequestFailed {
                    provider: "scripted".to_string(),
                    reason: "quota exceeded".to_string(),
                }),
            }
        }
    }

    fn answers(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    const FENCED: &str = "```json\n{\"type\":\"X\",\"message\":\"This is my message for you: Y\",\"traits\":[\"a\",\"b\",\"c\",\"d\"],\"color\":\"#667eea\"}\n```";

    // --- pipeline steps ---

    #[test]
    fn clean_response_strips_fences_and_whitespace() {
        assert_eq!(clean_response("  ```json\n{\"a\":1}\n```  "), "{\"a\":1}");
        assert_eq!(clean_response("```\n{}\n```"), "{}");
        assert_eq!(clean_response("plain"), "plain");
    }

    #[test]
    fn extract_takes_first_open_and_last_close() {
        let text = "Sure! Here you go: {\"a\": {\"b\": 1}} hope that helps }";
        assert_eq!(
            extract_json_object(text).unwrap(),
            "{\"a\": {\"b\": 1}} hope that helps }"
        );
        assert_eq!(extract_json_object("x {\"a\":1} y").unwrap(), "{\"a\":1}");
    }

    #[test]
    fn extract_rejects_missing_or_reversed_braces() {
        assert!(matches!(
            extract_json_object("no json here"),
            Err(ValidationError::NoJsonObject)
        ));
        assert!(matches!(
            extract_json_object("only { open"),
            Err(ValidationError::NoJsonObject)
        ));
        assert!(matches!(
            extract_json_object("} reversed {"),
            Err(ValidationError::NoJsonObject)
        ));
    }

    #[test]
    fn fenced_response_parses_exactly() {
        let profile = validate_response(FENCED).unwrap();
        assert_eq!(
            profile,
            PersonalityProfile {
                personality_type: "X".to_string(),
                message: "This is my message for you: Y".to_string(),
                traits: answers(&["a", "b", "c", "d"]),
                color: "#667eea".to_string(),
            }
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        let raw = r##"{"type":"X","message":"m","traits":["a"],"color":"#fff","mood":"sunny"}"##;
        assert_eq!(validate_response(raw).unwrap().traits, answers(&["a"]));
    }

    #[test]
    fn syntax_error_is_reported() {
        assert!(matches!(
            validate_response("{\"type\": \"X\", }"),
            Err(ValidationError::Syntax(_))
        ));
    }

    #[test]
    fn missing_color_is_reported() {
        let raw = r#"{"type":"X","message":"m","traits":["a","b","c","d"]}"#;
        assert!(matches!(
            validate_response(raw),
            Err(ValidationError::MissingField("color"))
        ));
    }

    #[test]
    fn non_array_traits_are_reported() {
        let raw = r##"{"type":"X","message":"m","traits":"brave","color":"#fff"}"##;
        assert!(matches!(
            validate_response(raw),
            Err(ValidationError::TraitsNotArray)
        ));
    }

    #[test]
    fn mistyped_fields_are_reported() {
        let raw = r##"{"type":7,"message":"m","traits":["a"],"color":"#fff"}"##;
        assert!(matches!(
            validate_response(raw),
            Err(ValidationError::WrongType("type"))
        ));

        let raw = r##"{"type":"X","message":"m","traits":["a", 2],"color":"#fff"}"##;
        assert!(matches!(
            validate_response(raw),
            Err(ValidationError::WrongType("traits"))
        ));
    }

    #[test]
    fn empty_traits_are_rejected() {
        let raw = r##"{"type":"X","message":"m","traits":[],"color":"#fff"}"##;
        assert!(matches!(
            validate_response(raw),
            Err(ValidationError::EmptyField("traits"))
        ));
    }

    #[test]
    fn blank_strings_are_rejected() {
        let raw = r##"{"type":"  ","message":"m","traits":["a"],"color":"#fff"}"##;
        assert!(matches!(
            validate_response(raw),
            Err(ValidationError::EmptyField("type"))
        ));
    }

    #[test]
    fn blank_trait_entries_are_rejected() {
        let raw = r##"{"type":"X","message":"m","traits":["", "  "],"color":"#fff"}"##;
        assert!(matches!(
            validate_response(raw),
            Err(ValidationError::EmptyField("traits"))
        ));

        let raw = r##"{"type":"X","message":"m","traits":["bold", " "],"color":"#fff"}"##;
        assert!(matches!(
            validate_response(raw),
            Err(ValidationError::EmptyField("traits"))
        ));
    }

    // --- analyze ---

    #[tokio::test]
    async fn empty_answers_are_rejected() {
        let analyzer = ProfileAnalyzer::new(Some(ScriptedLlm::replying(FENCED)));
        let err = analyzer.analyze(&[]).await.unwrap_err();
        assert_eq!(err, AnalysisError::EmptyInput);
    }

    #[tokio::test]
    async fn no_provider_serves_fallback() {
        let analyzer = ProfileAnalyzer::fallback_only();
        assert!(!analyzer.has_llm());

        let input = answers(&["abc"]);
        let analysis = analyzer.analyze(&input).await.unwrap();
        assert_eq!(
            analysis.source,
            ProfileSource::Fallback(FallbackReason::NoProvider)
        );
        assert_eq!(analysis.profile, fallback_profile(&input));
    }

    #[tokio::test]
    async fn model_reply_is_returned_and_prompt_is_sent() {
        let llm = ScriptedLlm::replying(FENCED);
        let analyzer = ProfileAnalyzer::new(Some(llm.clone()));

        let analysis = analyzer
            .analyze(&answers(&["Laptop - Power and versatility"]))
            .await
            .unwrap();
        assert_eq!(analysis.source, ProfileSource::Model);
        assert_eq!(analysis.profile.personality_type, "X");

        let requests = llm.requests.lock().await;
        assert_eq!(requests.len(), 1);
        assert!(
            requests[0]
                .prompt
                .contains("1. Laptop - Power and versatility")
        );
        assert_eq!(requests[0].generation, GenerationConfig::PERSONALITY);
    }

    #[tokio::test]
    async fn provider_failure_serves_fallback() {
        let analyzer = ProfileAnalyzer::new(Some(ScriptedLlm::failing()));
        let input = answers(&["abcd"]);
        let analysis = analyzer.analyze(&input).await.unwrap();
        assert_eq!(
            analysis.source,
            ProfileSource::Fallback(FallbackReason::ProviderFailed)
        );
        assert_eq!(
            analysis.profile,
            PersonalityProfile::from(&FALLBACK_PROFILES[1])
        );
    }

    #[tokio::test]
    async fn prose_reply_serves_fallback() {
        let analyzer = ProfileAnalyzer::new(Some(ScriptedLlm::replying(
            "You seem like a wonderful person with many talents.",
        )));
        let input = answers(&["abcde"]);
        let analysis = analyzer.analyze(&input).await.unwrap();
        assert_eq!(
            analysis.source,
            ProfileSource::Fallback(FallbackReason::InvalidResponse)
        );
        assert_eq!(
            analysis.profile,
            PersonalityProfile::from(&FALLBACK_PROFILES[2])
        );
    }

    #[tokio::test]
    async fn reply_missing_color_serves_fallback() {
        let analyzer = ProfileAnalyzer::new(Some(ScriptedLlm::replying(
            r#"{"type":"X","message":"This is my message for you: Y","traits":["a","b","c","d"]}"#,
        )));
        let input = answers(&["abc"]);
        let analysis = analyzer.analyze(&input).await.unwrap();
        assert_eq!(
            analysis.source,
            ProfileSource::Fallback(FallbackReason::InvalidResponse)
        );
        assert_eq!(analysis.profile, fallback_profile(&input));
    }
}
