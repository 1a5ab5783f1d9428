//! Axum route handlers for the recommendation API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::gemini::ModelDescriptor;
use crate::recommendation::generator::Source;
use crate::recommendation::prompts::{DEFAULT_BIRTH_CHART, DEFAULT_DISC_PROFILE};
use crate::recommendation::provider::ProviderState;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct GenerateRequest {
    /// Birth-chart label; defaults to the fixed sample when omitted.
    pub birth: Option<String>,
    /// DISC-profile label; defaults to the fixed sample when omitted.
    pub disc: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub paragraph: String,
    pub source: Source,
}

#[derive(Debug, Serialize)]
pub struct ApiStatusResponse {
    /// "remote_ready" | "fallback_only"
    pub state: &'static str,
    /// The adopted model identifier, when remote generation is available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListModelsResponse {
    pub models: Vec<ModelDescriptor>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /generate
///
/// Produces one single-paragraph recommendation. Both fields are optional;
/// a missing body behaves like an empty object. Never fails on remote-side
/// problems: those are absorbed into the fallback paragraph.
pub async fn handle_generate(
    State(state): State<AppState>,
    body: Option<Json<GenerateRequest>>,
) -> Result<Json<GenerateResponse>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let birth = request.birth.as_deref().unwrap_or(DEFAULT_BIRTH_CHART);
    let disc = request.disc.as_deref().unwrap_or(DEFAULT_DISC_PROFILE);

    let recommendation = state.recommender.generate(birth, disc).await;

    Ok(Json(GenerateResponse {
        paragraph: recommendation.paragraph,
        source: recommendation.source,
    }))
}

/// GET /api-status
///
/// Read-only view of the provider state resolved at startup.
pub async fn handle_api_status(State(state): State<AppState>) -> Json<ApiStatusResponse> {
    let response = match state.recommender.state() {
        ProviderState::RemoteReady { model } => ApiStatusResponse {
            state: "remote_ready",
            model: Some(model.clone()),
        },
        ProviderState::FallbackOnly => ApiStatusResponse {
            state: "fallback_only",
            model: None,
        },
    };
    Json(response)
}

/// GET /models
///
/// Proxies the collaborator's model list, filtered to entries that support
/// `generateContent`. Only meaningful with a confirmed remote model; returns
/// 400 in fallback-only mode.
pub async fn handle_list_models(
    State(state): State<AppState>,
) -> Result<Json<ListModelsResponse>, AppError> {
    if !state.recommender.state().is_remote_ready() {
        return Err(AppError::RemoteUnavailable(
            "Gemini API not configured".to_string(),
        ));
    }

    let backend = state.recommender.backend().ok_or_else(|| {
        AppError::RemoteUnavailable("Gemini API not configured".to_string())
    })?;

    let models = backend
        .list_models()
        .await
        .map_err(|e| AppError::ModelListing(e.to_string()))?
        .into_iter()
        .filter(ModelDescriptor::supports_generate_content)
        .collect();

    Ok(Json(ListModelsResponse { models }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_request_fields_are_optional() {
        let request: GenerateRequest = serde_json::from_str("{}").unwrap();
        assert!(request.birth.is_none());
        assert!(request.disc.is_none());

        let request: GenerateRequest =
            serde_json::from_str(r#"{"birth": "Sun in Leo"}"#).unwrap();
        assert_eq!(request.birth.as_deref(), Some("Sun in Leo"));
        assert!(request.disc.is_none());
    }

    #[test]
    fn source_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Source::Remote).unwrap(), "\"remote\"");
        assert_eq!(
            serde_json::to_string(&Source::Fallback).unwrap(),
            "\"fallback\""
        );
    }
}
