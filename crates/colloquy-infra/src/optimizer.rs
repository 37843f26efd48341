//! HttpPromptOptimizer -- reqwest implementation of [`PromptOptimizer`].
//!
//! Talks to the prompt rewriting service (`POST {base}/rewrite`). The
//! service answers with either a rewritten prompt or a clarification
//! request; this adapter parses that into the tagged
//! [`OptimizeOutcome`] so callers match on a variant, never on ad hoc
//! field presence. Timeout enforcement lives in the gateway, not here.

use std::time::Duration;

use serde::Deserialize;

use colloquy_core::optimizer::PromptOptimizer;
use colloquy_types::optimizer::{OptimizeOutcome, OptimizeRequest, OptimizerError};

/// HTTP client for the prompt optimizer service.
pub struct HttpPromptOptimizer {
    client: reqwest::Client,
    base_url: String,
}

/// Wire shape of the rewrite response.
///
/// The service predates the tagged-enum contract, so both success
/// shapes arrive as optional fields on one flat object.
#[derive(Debug, Deserialize)]
struct RewritePayload {
    #[serde(default)]
    optimized_prompt: Option<String>,
    #[serde(default)]
    needs_clarification: bool,
    #[serde(default)]
    clarification_question: Option<String>,
}

impl RewritePayload {
    /// The clarification flag wins over any prompt also present.
    fn into_outcome(self) -> Result<OptimizeOutcome, OptimizerError> {
        if self.needs_clarification {
            return match self.clarification_question {
                Some(question) => Ok(OptimizeOutcome::NeedsClarification { question }),
                None => Err(OptimizerError::Malformed(
                    "needs_clarification set without a clarification_question".to_string(),
                )),
            };
        }
        match self.optimized_prompt {
            Some(prompt) => Ok(OptimizeOutcome::Optimized { prompt }),
            None => Err(OptimizerError::Malformed(
                "response carried neither an optimized prompt nor a clarification".to_string(),
            )),
        }
    }
}

impl HttpPromptOptimizer {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("failed to create reqwest client");
        Self { client, base_url }
    }
}

impl PromptOptimizer for HttpPromptOptimizer {
    async fn rewrite(&self, request: &OptimizeRequest) -> Result<OptimizeOutcome, OptimizerError> {
        let url = format!("{}/rewrite", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| OptimizerError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OptimizerError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: RewritePayload = response
            .json()
            .await
            .map_err(|e| OptimizerError::Malformed(e.to_string()))?;
        payload.into_outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<OptimizeOutcome, OptimizerError> {
        serde_json::from_str::<RewritePayload>(json)
            .unwrap()
            .into_outcome()
    }

    #[test]
    fn test_optimized_prompt_parses() {
        let outcome = parse(r#"{"optimized_prompt": "hi there"}"#).unwrap();
        assert_eq!(
            outcome,
            OptimizeOutcome::Optimized {
                prompt: "hi there".to_string()
            }
        );
    }

    #[test]
    fn test_clarification_parses() {
        let outcome = parse(
            r#"{"needs_clarification": true, "clarification_question": "What kind of thing?"}"#,
        )
        .unwrap();
        assert_eq!(
            outcome,
            OptimizeOutcome::NeedsClarification {
                question: "What kind of thing?".to_string()
            }
        );
    }

    #[test]
    fn test_clarification_wins_over_prompt() {
        let outcome = parse(
            r#"{
                "optimized_prompt": "ignored",
                "needs_clarification": true,
                "clarification_question": "Which one?"
            }"#,
        )
        .unwrap();
        assert!(matches!(
            outcome,
            OptimizeOutcome::NeedsClarification { .. }
        ));
    }

    #[test]
    fn test_clarification_without_question_is_malformed() {
        let err = parse(r#"{"needs_clarification": true}"#).unwrap_err();
        assert!(matches!(err, OptimizerError::Malformed(_)));
    }

    #[test]
    fn test_empty_object_is_malformed() {
        let err = parse("{}").unwrap_err();
        assert!(matches!(err, OptimizerError::Malformed(_)));
    }
}
