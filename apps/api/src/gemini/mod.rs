//! Gemini client — the single point of entry for all Generative Language API
//! calls in this service.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini REST API directly.
//! All remote generation and model listing MUST go through this module.
//!
//! The model identifier is not hardcoded here: it is resolved at startup by
//! probing a candidate list (see `recommendation::provider`). The endpoint
//! and API version are hardcoded to prevent drift.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::recommendation::provider::GenerativeBackend;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Per-call timeout. The upstream behavior had none; a bounded timeout is
/// required so a hung call degrades to fallback instead of stalling the
/// request.
const CALL_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("model returned empty content")]
    EmptyContent,
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (v1beta REST)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

/// One entry from the `GET /models` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "supportedGenerationMethods", default)]
    pub supported_generation_methods: Vec<String>,
}

impl ModelDescriptor {
    /// Only models that support `generateContent` are usable for this
    /// service; the listing endpoint filters on this.
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods
            .iter()
            .any(|m| m == "generateContent")
    }
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelDescriptor>,
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    error: GeminiApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiApiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Thin wrapper over the Generative Language REST API.
///
/// No retry logic: the only sweep over failures is the one-time candidate
/// probe at startup, and per-request failures degrade to the fallback
/// paragraph instead of being retried.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Result<Self, GeminiError> {
        Ok(Self {
            client: Client::builder().timeout(CALL_TIMEOUT).build()?,
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    async fn read_api_error(response: reqwest::Response) -> GeminiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<GeminiApiError>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        GeminiError::Api { status, message }
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn generate_content(&self, model: &str, prompt: &str) -> Result<String, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::read_api_error(response).await);
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = parsed.text();

        if text.trim().is_empty() {
            return Err(GeminiError::EmptyContent);
        }

        debug!(model, chars = text.len(), "generateContent succeeded");
        Ok(text)
    }

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, GeminiError> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::read_api_error(response).await);
        }

        let parsed: ListModelsResponse = response.json().await?;
        Ok(parsed.models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_joins_parts_of_first_candidate() {
        let raw = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "Hello, "}, {"text": "world."}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.text(), "Hello, world.");
    }

    #[test]
    fn response_text_empty_when_no_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.text(), "");
    }

    #[test]
    fn model_descriptor_filters_on_generate_content() {
        let raw = r#"{
            "name": "models/gemini-1.5-pro",
            "supportedGenerationMethods": ["generateContent", "countTokens"]
        }"#;
        let model: ModelDescriptor = serde_json::from_str(raw).unwrap();
        assert!(model.supports_generate_content());

        let raw = r#"{"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]}"#;
        let model: ModelDescriptor = serde_json::from_str(raw).unwrap();
        assert!(!model.supports_generate_content());
    }
}
