use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

use unibot_core::config::GeneratorSettings;
use unibot_core::traits::Generator;
use unibot_core::GenerateError;

const API_KEY_HEADER: &str = "x-goog-api-key";
const ANSWER_POINTER: &str = "/candidates/0/content/parts/0/text";

/// `generateContent` client: one user turn in, the first candidate's text out.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self, GenerateError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenerateError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, url: url.into(), api_key: api_key.into() })
    }

    /// Fails with `NotConfigured` unless both the endpoint and the key are set.
    pub fn from_settings(settings: &GeneratorSettings) -> Result<Self, GenerateError> {
        let url = settings
            .api_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| GenerateError::NotConfigured("generator.api_url is not set".into()))?;
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| GenerateError::NotConfigured("generator.api_key is not set".into()))?;
        Self::new(url, api_key, Duration::from_secs(settings.timeout_secs))
    }
}

#[async_trait]
impl Generator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });

        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerateError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Provider { status: status.as_u16(), body });
        }

        let payload: Value = response.json().await.map_err(|e| GenerateError::Malformed(e.to_string()))?;
        let answer = payload
            .pointer(ANSWER_POINTER)
            .and_then(Value::as_str)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| GenerateError::Malformed("no text in candidates[0].content.parts[0]".into()))?;
        debug!(chars = answer.chars().count(), "generator answered");
        Ok(answer.to_string())
    }
}
