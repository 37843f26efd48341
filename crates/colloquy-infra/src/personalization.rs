//! HttpPersonalizationProvider -- reqwest implementation of
//! [`PersonalizationProvider`].
//!
//! Reads learned insights back from the learning subsystem
//! (`GET {base}/users/{user_id}/insights`), keeps the confident ones,
//! and flattens them into the text blob forwarded to model backends.

use std::time::Duration;

use serde::Deserialize;

use colloquy_core::personalization::PersonalizationProvider;
use colloquy_types::learning::{Insight, PersonalizationError};

/// HTTP client for the insights endpoint of the learning subsystem.
pub struct HttpPersonalizationProvider {
    client: reqwest::Client,
    base_url: String,
}

/// Wire shape of the insights response.
#[derive(Debug, Deserialize)]
struct InsightsPayload {
    #[serde(default)]
    insights: Vec<Insight>,
}

impl HttpPersonalizationProvider {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("failed to create reqwest client");
        Self { client, base_url }
    }
}

/// Render actionable insights into the blob sent to backends.
///
/// Low-confidence insights are dropped here, not at the service; the
/// threshold is a client-side policy. Returns an empty string when
/// nothing clears the bar.
fn render_insights(insights: &[Insight]) -> String {
    let lines: Vec<String> = insights
        .iter()
        .filter(|insight| insight.is_actionable())
        .map(|insight| format!("- [{}] {}", insight.category, insight.content))
        .collect();

    if lines.is_empty() {
        return String::new();
    }
    format!("Known about this user:\n{}", lines.join("\n"))
}

impl PersonalizationProvider for HttpPersonalizationProvider {
    async fn fetch(&self, user_id: &str) -> Result<String, PersonalizationError> {
        let url = format!("{}/users/{user_id}/insights", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PersonalizationError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PersonalizationError::Http {
                status: status.as_u16(),
                message: body,
            });
        }

        let payload: InsightsPayload = response
            .json()
            .await
            .map_err(|e| PersonalizationError::Malformed(e.to_string()))?;
        Ok(render_insights(&payload.insights))
    }
}
