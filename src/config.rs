//! Configuration for Fun Fortune.
//!
//! Everything is read once at startup from the process environment (after
//! loading an optional `.env` file) and then handed around immutably.

use std::net::SocketAddr;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::error::ConfigError;

/// Origins allowed when `ALLOWED_ORIGINS` is not set.
pub const DEFAULT_ALLOWED_ORIGINS: &str =
    "http://localhost:5173,http://localhost:5174,http://localhost:5175";

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash-lite";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Main configuration for the service.
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub llm: LlmConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Callers load `.env` first; the binary does so before parsing its CLI.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            server: ServerConfig::from_env()?,
            cors: CorsConfig::from_env()?,
            llm: LlmConfig::from_env()?,
        })
    }
}

/// Bind address for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: optional_env("HOST")?.unwrap_or(defaults.host),
            port: parse_optional_env("PORT", defaults.port)?,
        })
    }

    /// Resolve the configured host and port into a socket address.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                key: "HOST".to_string(),
                message: format!("'{}' is not a valid bind address: {e}", self.host),
            })
    }
}

/// Cross-origin settings for the browser frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorsConfig {
    /// Origins in the order they were configured. May contain duplicates.
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = optional_env("ALLOWED_ORIGINS")?
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string());
        let production_url = optional_env("PRODUCTION_URL")?;
        Ok(Self::from_parts(&raw, production_url))
    }

    /// Build the origin list from the comma-separated `ALLOWED_ORIGINS` value
    /// and an optional production origin.
    ///
    /// The production origin is appended as-is, without deduplication or
    /// validation. A duplicate is only reported in the logs.
    pub fn from_parts(raw_origins: &str, production_url: Option<String>) -> Self {
        let mut allowed_origins: Vec<String> = raw_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        if let Some(url) = production_url {
            if allowed_origins.contains(&url) {
                tracing::warn!(
                    origin = %url,
                    "PRODUCTION_URL is already listed in ALLOWED_ORIGINS; appending anyway"
                );
            }
            allowed_origins.push(url);
        }

        Self { allowed_origins }
    }

    /// `true` when no origin survived parsing or `*` is listed, in which
    /// case every origin is allowed (without credentials).
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// `None` puts the service in fallback-only mode.
    pub gemini: Option<GeminiConfig>,
}

impl LlmConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let Some(api_key) = optional_env("GEMINI_API_KEY")? else {
            return Ok(Self { gemini: None });
        };

        Ok(Self {
            gemini: Some(GeminiConfig {
                api_key: SecretString::from(api_key),
                model: optional_env("GEMINI_MODEL")?
                    .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
                base_url: optional_env("GEMINI_BASE_URL")?
                    .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
                timeout: Duration::from_secs(parse_optional_env("GEMINI_TIMEOUT_SECS", 30)?),
            }),
        })
    }

    /// Whether a model credential is configured.
    pub fn is_enabled(&self) -> bool {
        self.gemini.is_some()
    }
}

/// Google Gemini `generateContent` configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
    /// Upper bound on a single model call.
    pub timeout: Duration,
}

impl GeminiConfig {
    /// Config for the default model and endpoint with the given key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::from(api_key.into()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Get the API key (exposes the secret).
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

// Helper functions

pub(crate) fn optional_env(key: &str) -> Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(val) if val.is_empty() => Ok(None),
        Ok(val) => Ok(Some(val)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(ConfigError::ParseError(format!(
            "failed to read {key}: {e}"
        ))),
    }
}

pub(crate) fn parse_optional_env<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    optional_env(key)?
        .map(|s| {
            s.parse().map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("{e}"),
            })
        })
        .transpose()
        .map(|opt| opt.unwrap_or(default))
}
