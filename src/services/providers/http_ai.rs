use std::time::Duration;

use reqwest::Client as HttpClient;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::services::providers::SuggestionProvider;

/// HTTP adapter for the external text-generation service.
///
/// Every transport error, timeout, or non-2xx status becomes
/// `AiUnavailable`; the network is the one true suspension point in a
/// recommendation turn and a hung call is treated the same as a failed one.
#[derive(Clone)]
pub struct HttpAiProvider {
    http_client: HttpClient,
    api_url: String,
    api_key: String,
    timeout: Duration,
}

impl HttpAiProvider {
    pub fn new(api_url: String, api_key: String, timeout: Duration) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_url,
            api_key,
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl SuggestionProvider for HttpAiProvider {
    async fn suggest(&self, prompt: &str) -> AppResult<String> {
        let response = self
            .http_client
            .post(&self.api_url)
            .timeout(self.timeout)
            .bearer_auth(&self.api_key)
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, provider = self.name(), "AI suggestion call failed");
                AppError::AiUnavailable(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(%status, provider = self.name(), "AI suggestion source returned error status");
            return Err(AppError::AiUnavailable(format!(
                "suggestion source returned status {}",
                status
            )));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| AppError::AiUnavailable(format!("unreadable response body: {}", e)))?;

        let text = body["text"]
            .as_str()
            .ok_or_else(|| {
                AppError::AiUnavailable("response body missing text field".to_string())
            })?
            .to_string();

        tracing::debug!(
            response_len = text.len(),
            provider = self.name(),
            "AI suggestion received"
        );
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "http_ai"
    }
}
