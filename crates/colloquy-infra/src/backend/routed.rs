//! RoutedModelBackend -- client for the legacy routed backend.
//!
//! The routed service predates the direct endpoint and keeps its old
//! envelope: request fields nest under `input`, the reply text arrives
//! under `result.text`. Kept as a fallback candidate until the service
//! is retired; the envelope translation is fully contained here.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use colloquy_core::backend::ModelBackend;
use colloquy_types::backend::{BackendError, InferenceRequest, InferenceResponse};
use colloquy_types::exchange::ConversationEntry;

/// HTTP client for the legacy routed backend.
pub struct RoutedModelBackend {
    name: String,
    client: reqwest::Client,
    base_url: String,
    model: Option<String>,
    api_key: Option<SecretString>,
}

#[derive(Debug, Serialize)]
struct RoutedInput<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    history: &'a [ConversationEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    personalization: Option<&'a str>,
}

/// Legacy request envelope for `POST {base}/route/infer`.
#[derive(Debug, Serialize)]
struct RoutedRequest<'a> {
    input: RoutedInput<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct RoutedResult {
    text: String,
    #[serde(default)]
    model: Option<String>,
}

/// Legacy response envelope.
#[derive(Debug, Deserialize)]
struct RoutedResponse {
    result: RoutedResult,
}

impl RoutedModelBackend {
    pub fn new(
        name: String,
        base_url: String,
        model: Option<String>,
        api_key: Option<SecretString>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("failed to create reqwest client");
        Self {
            name,
            client,
            base_url,
            model,
            api_key,
        }
    }
}

// RoutedModelBackend intentionally does NOT derive Debug so the API
// key can never leak through formatting.

impl ModelBackend for RoutedModelBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResponse, BackendError> {
        let url = format!("{}/route/infer", self.base_url);
        let body = RoutedRequest {
            input: RoutedInput {
                message: &request.message,
                history: &request.history,
                personalization: request.personalization.as_deref(),
            },
            model: self.model.as_deref(),
        };

        let mut http_request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            http_request = http_request.bearer_auth(key.expose_secret());
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                503 => BackendError::Unavailable(body),
                code => BackendError::Http {
                    status: code,
                    message: body,
                },
            });
        }

        let payload: RoutedResponse = response
            .json()
            .await
            .map_err(|e| BackendError::Malformed(e.to_string()))?;

        Ok(InferenceResponse {
            content: payload.result.text,
            model: payload.result.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_nests_under_input() {
        let body = RoutedRequest {
            input: RoutedInput {
                message: "hello",
                history: &[],
                personalization: None,
            },
            model: Some("legacy-v2"),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["input"]["message"], "hello");
        assert_eq!(json["model"], "legacy-v2");
    }

    #[test]
    fn test_response_unwraps_result_envelope() {
        let json = r#"{"result": {"text": "Hello!", "model": "legacy-v2"}}"#;
        let payload: RoutedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(payload.result.text, "Hello!");
        assert_eq!(payload.result.model.as_deref(), Some("legacy-v2"));
    }

    #[test]
    fn test_response_without_model_field() {
        let json = r#"{"result": {"text": "Hello!"}}"#;
        let payload: RoutedResponse = serde_json::from_str(json).unwrap();
        assert!(payload.result.model.is_none());
    }
}
