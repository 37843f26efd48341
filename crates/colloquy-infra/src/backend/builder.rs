//! Assembles the backend dispatcher from configuration.
//!
//! Each enabled candidate becomes a boxed client of the matching kind;
//! API keys are resolved from the environment variable the candidate
//! names. Ordering itself is the dispatcher's job.

use std::time::Duration;

use secrecy::SecretString;

use colloquy_core::backend::{BackendDispatcher, BoxModelBackend, Candidate};
use colloquy_types::backend::{BackendKind, CandidateConfig, DispatchConfig};

use super::direct::DirectModelBackend;
use super::routed::RoutedModelBackend;

/// Build a ready dispatcher from the configured candidate list.
///
/// Disabled candidates are skipped. A configuration with no enabled
/// candidates still produces a dispatcher; it will fail every dispatch
/// with `NoCandidates`, which the warn here makes diagnosable.
pub fn build_dispatcher(
    config: &DispatchConfig,
    per_candidate_timeout: Duration,
) -> BackendDispatcher {
    let mut candidates = Vec::new();

    for candidate in &config.candidates {
        if !candidate.enabled {
            tracing::debug!(name = %candidate.name, "Skipping disabled backend candidate");
            continue;
        }

        let api_key = resolve_api_key(candidate);
        let backend = match candidate.kind {
            BackendKind::Direct => BoxModelBackend::new(DirectModelBackend::new(
                candidate.name.clone(),
                candidate.base_url.clone(),
                candidate.model.clone(),
                api_key,
            )),
            BackendKind::Routed => BoxModelBackend::new(RoutedModelBackend::new(
                candidate.name.clone(),
                candidate.base_url.clone(),
                candidate.model.clone(),
                api_key,
            )),
        };
        candidates.push(Candidate {
            priority: candidate.priority,
            backend,
        });
    }

    if candidates.is_empty() {
        tracing::warn!("No enabled backend candidates configured; dispatch will fail every turn");
    }

    BackendDispatcher::new(candidates, per_candidate_timeout)
}

/// Read the candidate's API key from its configured environment
/// variable, if any. The value goes straight into a [`SecretString`].
fn resolve_api_key(candidate: &CandidateConfig) -> Option<SecretString> {
    let env_var = candidate.api_key_env.as_deref()?;
    match std::env::var(env_var) {
        Ok(value) if !value.is_empty() => Some(SecretString::from(value)),
        _ => {
            tracing::warn!(
                name = %candidate.name,
                env_var,
                "API key environment variable not set; candidate will call unauthenticated"
            );
            None
        }
    }
}
