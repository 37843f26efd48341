//! HttpLearningSink -- reqwest implementation of [`LearningSink`].
//!
//! Submits completed exchanges to the learning subsystem
//! (`POST {base}/learn`). The response body is ignored: the emitter
//! in colloquy-core already treats the submission as fire-and-forget,
//! so all this adapter owes the caller is an honest error.

use std::time::Duration;

use colloquy_core::learning::LearningSink;
use colloquy_types::learning::{LearningError, LearningEvent};

/// HTTP client for the learning ingestion endpoint.
pub struct HttpLearningSink {
    client: reqwest::Client,
    base_url: String,
}

impl HttpLearningSink {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create reqwest client");
        Self { client, base_url }
    }
}

impl LearningSink for HttpLearningSink {
    async fn record(&self, event: LearningEvent) -> Result<(), LearningError> {
        let url = format!("{}/learn", self.base_url);

        let response = self
            .client
            .post(&url)
            .json(&event)
            .send()
            .await
            .map_err(|e| LearningError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LearningError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(())
    }
}
