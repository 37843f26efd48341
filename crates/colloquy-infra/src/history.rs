//! HttpHistoryProvider -- reqwest implementation of [`HistoryProvider`].
//!
//! Talks to the external history service:
//! `GET {base}/users/{user_id}/history?app_id=&limit=&offset=`.
//! Entries come back oldest first; this adapter does not reorder.

use std::time::Duration;

use serde::Deserialize;

use colloquy_core::history::HistoryProvider;
use colloquy_types::error::HistoryError;
use colloquy_types::exchange::ConversationEntry;

/// HTTP client for the conversation history service.
pub struct HttpHistoryProvider {
    client: reqwest::Client,
    base_url: String,
}

/// Wire shape of the history service response.
#[derive(Debug, Deserialize)]
struct HistoryPayload {
    #[serde(default)]
    entries: Vec<ConversationEntry>,
}

impl HttpHistoryProvider {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create reqwest client");
        Self { client, base_url }
    }
}

impl HistoryProvider for HttpHistoryProvider {
    async fn fetch(
        &self,
        user_id: &str,
        app_id: Option<&str>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ConversationEntry>, HistoryError> {
        let url = format!("{}/users/{user_id}/history", self.base_url);
        let mut request = self
            .client
            .get(&url)
            .query(&[("limit", limit), ("offset", offset)]);
        if let Some(app_id) = app_id {
            request = request.query(&[("app_id", app_id)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HistoryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HistoryError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: HistoryPayload = response
            .json()
            .await
            .map_err(|e| HistoryError::Malformed(e.to_string()))?;
        Ok(payload.entries)
    }
}
