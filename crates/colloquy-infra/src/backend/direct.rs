//! DirectModelBackend -- client for the unified model-serving endpoint.
//!
//! Sends `POST {base}/v1/infer` with the message, replayed history, and
//! the personalization blob. Authenticates with a bearer token when the
//! candidate is configured with one.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use colloquy_core::backend::ModelBackend;
use colloquy_types::backend::{BackendError, InferenceRequest, InferenceResponse};
use colloquy_types::exchange::ConversationEntry;

/// HTTP client for a direct model-serving backend.
pub struct DirectModelBackend {
    name: String,
    client: reqwest::Client,
    base_url: String,
    model: Option<String>,
    api_key: Option<SecretString>,
}

/// Wire shape of the direct inference request.
#[derive(Debug, Serialize)]
struct DirectRequest<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    history: &'a [ConversationEntry],
    #[serde(skip_serializing_if = "Option::is_none")]
    personalization: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

impl DirectModelBackend {
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

// DirectModelBackend intentionally does NOT derive Debug so the API
// key can never leak through formatting.

impl ModelBackend for DirectModelBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn infer(&self, request: &InferenceRequest) -> Result<InferenceResponse, BackendError> {
        let url = format!("{}/v1/infer", self.base_url);
        let body = DirectRequest {
            message: &request.message,
            history: &request.history,
            personalization: request.personalization.as_deref(),
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

        response
            .json::<InferenceResponse>()
            .await
            .map_err(|e| BackendError::Malformed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_omits_empty_optional_fields() {
        let body = DirectRequest {
            message: "hello",
            history: &[],
            personalization: None,
            model: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"message":"hello"}"#);
    }

    #[test]
    fn test_request_carries_personalization_and_model() {
        let history = vec![ConversationEntry::user("earlier")];
        let body = DirectRequest {
            message: "hello",
            history: &history,
            personalization: Some("prefers concise answers"),
            model: Some("colloquy-large"),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["personalization"], "prefers concise answers");
        assert_eq!(json["model"], "colloquy-large");
        assert_eq!(json["history"][0]["content"], "earlier");
    }

    #[test]
    fn test_backend_name() {
        let backend = DirectModelBackend::new(
            "direct".to_string(),
            "http://127.0.0.1:7110".to_string(),
            None,
            None,
        );
        assert_eq!(backend.name(), "direct");
    }
}
