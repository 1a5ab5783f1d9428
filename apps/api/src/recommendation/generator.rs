//! The recommender: one `generate` call per request, reading the provider
//! state resolved at startup.
//!
//! Remote failures never escape this module. A request served while the
//! remote call errors (or returns empty) gets the fallback paragraph for
//! that request only; the provider state is untouched.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::recommendation::fallback::FALLBACK_PARAGRAPH;
use crate::recommendation::prompts::build_prompt;
use crate::recommendation::provider::{GenerativeBackend, ProviderState};

/// Remote responses longer than this are truncated to their first few
/// sentence-like segments.
const MAX_PARAGRAPH_CHARS: usize = 500;
const TRUNCATE_SEGMENTS: usize = 3;

/// Provenance of a generated paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Remote,
    Fallback,
}

/// One generated paragraph plus its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub paragraph: String,
    pub source: Source,
}

/// Read-only handle combining the probed provider state with the backend it
/// was probed against. Built once in main, shared by every handler.
pub struct Recommender {
    backend: Option<Arc<dyn GenerativeBackend>>,
    state: ProviderState,
}

impl Recommender {
    pub fn new(backend: Option<Arc<dyn GenerativeBackend>>, state: ProviderState) -> Self {
        // A RemoteReady state without a backend cannot serve remote calls;
        // normalize rather than panic at request time.
        let state = match (&backend, state) {
            (None, ProviderState::RemoteReady { model }) => {
                warn!(model = %model, "remote-ready state without a backend, degrading to fallback-only");
                ProviderState::FallbackOnly
            }
            (_, state) => state,
        };
        Self { backend, state }
    }

    pub fn fallback_only() -> Self {
        Self {
            backend: None,
            state: ProviderState::FallbackOnly,
        }
    }

    pub fn state(&self) -> &ProviderState {
        &self.state
    }

    /// The backend, for endpoints that proxy it directly (model listing).
    pub fn backend(&self) -> Option<&Arc<dyn GenerativeBackend>> {
        self.backend.as_ref()
    }

    /// Produces one career-recommendation paragraph. Infallible by design:
    /// every remote-side problem is absorbed into the fallback paragraph.
    pub async fn generate(&self, birth_chart: &str, disc_profile: &str) -> Recommendation {
        let (backend, model) = match (&self.backend, &self.state) {
            (Some(backend), ProviderState::RemoteReady { model }) => (backend, model),
            _ => return self.fallback(),
        };

        let prompt = build_prompt(birth_chart, disc_profile);

        match backend.generate_content(model, &prompt).await {
            Ok(text) if !text.trim().is_empty() => {
                info!(model = %model, "served remote recommendation");
                Recommendation {
                    paragraph: into_single_paragraph(&text),
                    source: Source::Remote,
                }
            }
            Ok(_) => {
                warn!(model = %model, "remote returned empty response, serving fallback");
                self.fallback()
            }
            Err(err) => {
                warn!(model = %model, error = %err, "remote call failed, serving fallback");
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> Recommendation {
        Recommendation {
            paragraph: FALLBACK_PARAGRAPH.to_string(),
            source: Source::Fallback,
        }
    }
}

/// Collapses all whitespace runs (including newlines) into single spaces and
/// truncates overlong text, guaranteeing single-paragraph output.
fn into_single_paragraph(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_to_segments(&collapsed)
}

/// Keeps the first [`TRUNCATE_SEGMENTS`] ". "-separated segments of text
/// longer than [`MAX_PARAGRAPH_CHARS`], re-appending the final period.
///
/// Splitting on ". " is a heuristic and will cut short sentences containing
/// dotted abbreviations ("Dr. Smith"); accepted as-is, the output is a
/// best-effort summary rather than a faithful prefix.
fn truncate_to_segments(paragraph: &str) -> String {
    if paragraph.len() <= MAX_PARAGRAPH_CHARS {
        return paragraph.to_string();
    }

    let segments: Vec<&str> = paragraph.split(". ").collect();
    let mut truncated = segments
        .into_iter()
        .take(TRUNCATE_SEGMENTS)
        .collect::<Vec<_>>()
        .join(". ");
    if !truncated.ends_with('.') {
        truncated.push('.');
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::provider::testing::{Reply, ScriptedBackend};

    fn remote_recommender(backend: ScriptedBackend, model: &str) -> (Recommender, Arc<ScriptedBackend>) {
        let backend = Arc::new(backend);
        let recommender = Recommender::new(
            Some(backend.clone() as Arc<dyn GenerativeBackend>),
            ProviderState::RemoteReady {
                model: model.to_string(),
            },
        );
        (recommender, backend)
    }

    #[test]
    fn collapses_newlines_and_whitespace_runs() {
        let input = "One  two\nthree\n\n  four\tfive";
        assert_eq!(into_single_paragraph(input), "One two three four five");
    }

    #[test]
    fn short_paragraph_is_untouched() {
        let input = "Short and sweet. Nothing to cut.";
        assert_eq!(truncate_to_segments(input), input);
    }

    #[test]
    fn overlong_paragraph_keeps_first_three_segments() {
        // Five segments, each 120 chars of body, well over the 500 limit.
        let segment = "x".repeat(120);
        let input = (0..5).map(|_| segment.clone()).collect::<Vec<_>>().join(". ");
        let expected = format!("{segment}. {segment}. {segment}.");
        assert_eq!(truncate_to_segments(&input), expected);
    }

    #[test]
    fn truncation_does_not_double_the_final_period() {
        let segment = "y".repeat(300);
        let input = format!("{segment}. {segment}. end already terminated.");
        let out = truncate_to_segments(&input);
        assert!(out.ends_with("terminated."));
        assert!(!out.ends_with(".."));
    }

    #[tokio::test]
    async fn fallback_only_never_touches_the_backend() {
        let recommender = Recommender::fallback_only();
        let a = recommender.generate("Sun in Leo", "High D").await;
        let b = recommender.generate("Moon in Pisces", "High S").await;
        assert_eq!(a.source, Source::Fallback);
        // Byte-identical regardless of inputs.
        assert_eq!(a.paragraph, b.paragraph);
        assert!(!a.paragraph.contains('\n'));
    }

    #[tokio::test]
    async fn failed_probe_leaves_no_remote_calls_for_later_requests() {
        use crate::recommendation::provider::{initialize, CANDIDATE_MODELS};

        let backend = Arc::new(ScriptedBackend::all_failing());
        let state = initialize(Some(backend.as_ref() as &dyn GenerativeBackend)).await;
        assert_eq!(state, ProviderState::FallbackOnly);
        let probe_calls = backend.calls().len();
        assert_eq!(probe_calls, CANDIDATE_MODELS.len());

        let recommender =
            Recommender::new(Some(backend.clone() as Arc<dyn GenerativeBackend>), state);
        let rec = recommender.generate("chart", "profile").await;
        assert_eq!(rec.source, Source::Fallback);
        // Degradation is idempotent: no further backend traffic.
        assert_eq!(backend.calls().len(), probe_calls);
    }

    #[tokio::test]
    async fn remote_success_is_collapsed_and_tagged() {
        let (recommender, backend) = remote_recommender(
            ScriptedBackend::new(vec![("m", Reply::Text("A fine\ncareer awaits.".into()))]),
            "m",
        );
        let rec = recommender.generate("chart", "profile").await;
        assert_eq!(rec.source, Source::Remote);
        assert_eq!(rec.paragraph, "A fine career awaits.");
        assert_eq!(backend.calls(), vec!["m"]);
    }

    #[tokio::test]
    async fn remote_failure_degrades_without_demoting_state() {
        let (recommender, _backend) =
            remote_recommender(ScriptedBackend::all_failing(), "m");

        let rec = recommender.generate("chart", "profile").await;
        assert_eq!(rec.source, Source::Fallback);
        assert_eq!(rec.paragraph, crate::recommendation::fallback::FALLBACK_PARAGRAPH);

        // The transient failure must not flip the process into fallback-only.
        assert!(recommender.state().is_remote_ready());
    }

    #[tokio::test]
    async fn remote_empty_response_degrades_for_that_request() {
        let (recommender, _backend) = remote_recommender(
            ScriptedBackend::new(vec![("m", Reply::Empty)]),
            "m",
        );
        let rec = recommender.generate("chart", "profile").await;
        assert_eq!(rec.source, Source::Fallback);
        assert!(recommender.state().is_remote_ready());
    }

    #[tokio::test]
    async fn output_never_contains_newlines() {
        let (recommender, _backend) = remote_recommender(
            ScriptedBackend::new(vec![(
                "m",
                Reply::Text("Line one.\nLine two.\r\nLine three.".into()),
            )]),
            "m",
        );
        let rec = recommender.generate("chart", "profile").await;
        assert!(!rec.paragraph.contains('\n'));
        assert!(!rec.paragraph.contains('\r'));
    }
}
