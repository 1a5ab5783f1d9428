//! Provider selection — the startup probe that decides whether remote
//! generation is usable and, if so, with which model.
//!
//! The resolved [`ProviderState`] is written exactly once, before the first
//! request is served, and only read afterwards. There is no re-probe and no
//! transition back: a process that starts fallback-only stays fallback-only,
//! and a per-request remote failure never demotes a `RemoteReady` process.

use async_trait::async_trait;
use tracing::{info, warn};

use crate::gemini::{GeminiError, ModelDescriptor};

/// Candidate model identifiers, ordered newest/most-capable first. The probe
/// adopts the first one that answers a trivial prompt; identifiers further
/// down exist because availability varies by API key and region.
pub const CANDIDATE_MODELS: &[&str] = &[
    "gemini-2.0-flash",
    "gemini-2.0-flash-001",
    "gemini-1.5-pro-latest",
    "gemini-1.5-pro-002",
    "gemini-1.5-pro",
    "gemini-1.5-flash-latest",
    "gemini-1.5-flash-002",
    "gemini-1.5-flash",
];

/// The trivial prompt used to confirm a candidate actually answers.
pub const PROBE_PROMPT: &str = "Hello";

/// Abstraction over the remote generative API, so the probe and the
/// recommender can be exercised in tests without network. `GeminiClient` is
/// the only production implementation.
///
/// Carried as `Arc<dyn GenerativeBackend>`.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    async fn generate_content(&self, model: &str, prompt: &str) -> Result<String, GeminiError>;

    async fn list_models(&self) -> Result<Vec<ModelDescriptor>, GeminiError>;
}

/// Process-lifetime record of whether remote generation is usable.
///
/// `UNINITIALIZED → PROBING → {RemoteReady | FallbackOnly}`; the two terminal
/// states persist until the process exits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderState {
    /// Remote generation confirmed with the adopted model identifier.
    RemoteReady { model: String },
    /// No credential, or no candidate answered the probe. All generation is
    /// served from the static fallback paragraph.
    FallbackOnly,
}

impl ProviderState {
    pub fn is_remote_ready(&self) -> bool {
        matches!(self, ProviderState::RemoteReady { .. })
    }
}

/// Outcome of one candidate sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The first candidate that returned a non-empty response.
    Adopted { model: String },
    /// Every candidate failed or returned empty.
    NoneUsable,
}

/// Sweeps `candidates` in order against `backend` and adopts the first one
/// that returns a non-empty response to [`PROBE_PROMPT`]. Each candidate is
/// attempted at most once; candidates after the adopted one are never
/// touched. Pure over its inputs: holds no state and performs no retries.
pub async fn probe_candidates(
    backend: &dyn GenerativeBackend,
    candidates: &[&str],
) -> ProbeOutcome {
    for model in candidates {
        match backend.generate_content(model, PROBE_PROMPT).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(model, "probe succeeded, adopting model");
                return ProbeOutcome::Adopted {
                    model: (*model).to_string(),
                };
            }
            Ok(_) => {
                warn!(model, "probe returned empty response, trying next candidate");
            }
            Err(err) => {
                warn!(model, error = %err, "probe failed, trying next candidate");
            }
        }
    }

    warn!("no candidate model answered the probe");
    ProbeOutcome::NoneUsable
}

/// Resolves the provider state for this process. Runs once at startup.
///
/// A `None` backend means no credential was configured; that and a fully
/// failed sweep both land in `FallbackOnly`. Nothing here is fatal to the
/// caller.
pub async fn initialize(backend: Option<&dyn GenerativeBackend>) -> ProviderState {
    let Some(backend) = backend else {
        info!("no API credential configured, running fallback-only");
        return ProviderState::FallbackOnly;
    };

    match probe_candidates(backend, CANDIDATE_MODELS).await {
        ProbeOutcome::Adopted { model } => ProviderState::RemoteReady { model },
        ProbeOutcome::NoneUsable => ProviderState::FallbackOnly,
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{Reply, ScriptedBackend};
    use super::*;

    #[tokio::test]
    async fn adopts_first_candidate_that_answers() {
        let backend = ScriptedBackend::new(vec![("alpha", Reply::Text("Hi".into()))]);
        let outcome = probe_candidates(&backend, &["alpha", "beta"]).await;
        assert_eq!(
            outcome,
            ProbeOutcome::Adopted {
                model: "alpha".into()
            }
        );
        // "beta" must never be touched once "alpha" is adopted.
        assert_eq!(backend.calls(), vec!["alpha"]);
    }

    #[tokio::test]
    async fn third_candidate_adopted_after_two_single_attempts() {
        let backend = ScriptedBackend::new(vec![
            ("alpha", Reply::Fail),
            ("beta", Reply::Empty),
            ("gamma", Reply::Text("Hello there".into())),
        ]);
        let outcome = probe_candidates(&backend, &["alpha", "beta", "gamma", "delta"]).await;
        assert_eq!(
            outcome,
            ProbeOutcome::Adopted {
                model: "gamma".into()
            }
        );
        assert_eq!(backend.calls(), vec!["alpha", "beta", "gamma"]);
    }

    #[tokio::test]
    async fn whitespace_only_response_counts_as_empty() {
        let backend = ScriptedBackend::new(vec![
            ("alpha", Reply::Text("   \n ".into())),
            ("beta", Reply::Text("ok".into())),
        ]);
        let outcome = probe_candidates(&backend, &["alpha", "beta"]).await;
        assert_eq!(outcome, ProbeOutcome::Adopted { model: "beta".into() });
    }

    #[tokio::test]
    async fn all_failures_yield_none_usable() {
        let backend = ScriptedBackend::all_failing();
        let outcome = probe_candidates(&backend, &["alpha", "beta"]).await;
        assert_eq!(outcome, ProbeOutcome::NoneUsable);
        assert_eq!(backend.calls(), vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn initialize_without_credential_is_fallback_only() {
        assert_eq!(initialize(None).await, ProviderState::FallbackOnly);
    }

    #[tokio::test]
    async fn initialize_with_dead_backend_is_fallback_only() {
        let backend = ScriptedBackend::all_failing();
        let state = initialize(Some(&backend)).await;
        assert_eq!(state, ProviderState::FallbackOnly);
        // The sweep touched every candidate exactly once.
        assert_eq!(backend.calls().len(), CANDIDATE_MODELS.len());
    }
}
