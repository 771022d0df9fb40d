//! Request and response types for the HTTP API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeRequest {
    /// A body without `answers` is treated like an empty list.
    #[serde(default)]
    pub answers: Vec<String>,
}

/// Body of `GET /`.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
}

/// Body of `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// `"llm"` when a model is configured, `"fallback"` otherwise.
    pub mode: &'static str,
}

/// Error body, `{"detail": "..."}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}
