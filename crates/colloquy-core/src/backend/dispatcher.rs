//! Ordered backend fallback dispatch.
//!
//! Routes inference requests through an ordered list of candidate
//! backends. Candidates are tried strictly in configured priority
//! order with a bounded per-candidate timeout -- no racing, no latency
//! adaptivity. This is the one stage in the pipeline where failure is
//! not swallowed: with every candidate exhausted there is no sensible
//! reply to return.

use std::time::{Duration, Instant};

use tracing::Instrument;

use colloquy_types::backend::{BackendError, DispatchError, InferenceRequest, InferenceResponse};

use super::box_backend::BoxModelBackend;

/// One backend candidate with its configured priority.
pub struct Candidate {
    /// Dispatch priority; lower = tried first.
    pub priority: u32,
    pub backend: BoxModelBackend,
}

/// Result of a successful dispatch.
#[derive(Debug)]
pub struct DispatchResult {
    pub response: InferenceResponse,
    /// Name of the candidate that served the request.
    pub backend_name: String,
    /// Set when a non-primary candidate served the request.
    pub failover_note: Option<String>,
}

/// Tries candidate backends in fixed priority order.
///
/// Order is established once at construction (priority ascending, name
/// as the deterministic tiebreak) and never changes at runtime.
pub struct BackendDispatcher {
    candidates: Vec<Candidate>,
    primary_name: Option<String>,
    per_candidate_timeout: Duration,
}

impl BackendDispatcher {
    /// Build a dispatcher from candidates and the per-candidate timeout.
    pub fn new(mut candidates: Vec<Candidate>, per_candidate_timeout: Duration) -> Self {
        candidates.sort_by(|a, b| {
            a.priority
                .cmp(&b.priority)
                .then_with(|| a.backend.name().cmp(b.backend.name()))
        });
        let primary_name = candidates.first().map(|c| c.backend.name().to_string());

        Self {
            candidates,
            primary_name,
            per_candidate_timeout,
        }
    }

    /// Candidate names in dispatch order (for status output).
    pub fn candidate_names(&self) -> Vec<&str> {
        self.candidates.iter().map(|c| c.backend.name()).collect()
    }

    /// Send an inference request through the candidate chain.
    ///
    /// On a candidate failure or timeout, logs and advances to the
    /// next candidate. Surfaces a hard [`DispatchError`] only when
    /// every candidate has failed.
    pub async fn dispatch(
        &self,
        request: &InferenceRequest,
    ) -> Result<DispatchResult, DispatchError> {
        if self.candidates.is_empty() {
            return Err(DispatchError::NoCandidates);
        }

        let mut last_error: Option<BackendError> = None;

        for candidate in &self.candidates {
            let backend_name = candidate.backend.name().to_string();
            let start = Instant::now();

            let span = tracing::info_span!(
                "gen_ai.infer",
                gen_ai.system = %backend_name,
                gen_ai.request.stream = false,
            );
            let outcome = tokio::time::timeout(
                self.per_candidate_timeout,
                candidate.backend.infer(request).instrument(span),
            )
            .await;
            let latency_ms = start.elapsed().as_millis() as u64;

            match outcome {
                Ok(Ok(response)) => {
                    tracing::debug!(
                        backend = %backend_name,
                        latency_ms,
                        "Backend produced a reply"
                    );
                    let failover_note = self.build_failover_note(&backend_name);
                    if let Some(ref note) = failover_note {
                        tracing::warn!(%note, "Failover occurred");
                    }
                    return Ok(DispatchResult {
                        response,
                        backend_name,
                        failover_note,
                    });
                }
                Ok(Err(err)) => {
                    tracing::warn!(
                        backend = %backend_name,
                        error = %err,
                        latency_ms,
                        "Backend failed, trying next candidate"
                    );
                    last_error = Some(err);
                }
                Err(_) => {
                    let err = BackendError::Timeout {
                        waited_ms: self.per_candidate_timeout.as_millis() as u64,
                    };
                    tracing::warn!(
                        backend = %backend_name,
                        error = %err,
                        "Backend timed out, trying next candidate"
                    );
                    last_error = Some(err);
                }
            }
        }

        Err(DispatchError::Exhausted {
            attempts: self.candidates.len(),
            last_error: last_error
                .unwrap_or_else(|| BackendError::Unavailable("no candidate attempted".to_string())),
        })
    }

    fn build_failover_note(&self, used: &str) -> Option<String> {
        match &self.primary_name {
            Some(primary) if primary != used => {
                Some(format!("Served by fallback backend '{used}' (primary '{primary}' failed)"))
            }
            _ => None,
        }
    }
}
