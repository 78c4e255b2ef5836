//! Text-generation providers
//!
//! Defines the provider trait and the Ollama-backed implementation.

use async_trait::async_trait;

use crate::config::TextGenConfig;

use super::types::{GenerationRequest, TextGenError};

/// Text-generation provider trait
#[async_trait]
pub trait TextGenProvider: Send + Sync {
    /// Human-readable backend name for logs and errors.
    fn name(&self) -> &str;

    /// Check if the provider is reachable.
    async fn is_available(&self) -> bool;

    /// Run one generation request to completion.
    async fn generate(&self, request: &GenerationRequest) -> Result<String, TextGenError>;
}

/// Ollama-compatible generation provider
pub struct OllamaProvider {
    /// API base URL
    base_url: String,
    /// Model name (e.g. "llama3")
    model: String,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            model: model.to_string(),
        }
    }

    pub fn from_config(config: &TextGenConfig) -> Self {
        Self::new(&config.base_url, &config.model)
    }
}

#[async_trait]
impl TextGenProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        let client = reqwest::Client::new();
        let url = format!("{}/api/tags", self.base_url);

        match client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, TextGenError> {
        let client = reqwest::Client::new();
        let url = format!("{}/api/generate", self.base_url);

        let body = serde_json::json!({
            "model": self.model,
            "system": request.context,
            "prompt": request.text,
            "stream": false
        });

        let response = client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| TextGenError::ApiError(format!("Failed to call backend: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TextGenError::ApiError(format!(
                "Backend returned {}: {}",
                status, body
            )));
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TextGenError::ApiError(format!("Failed to parse response: {}", e)))?;

        Ok(result["response"].as_str().unwrap_or("").trim().to_string())
    }
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockProvider {
    pub output: Result<String, &'static str>,
    pub available: bool,
}

#[cfg(test)]
#[async_trait]
impl TextGenProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn generate(&self, _request: &GenerationRequest) -> Result<String, TextGenError> {
        match &self.output {
            Ok(output) => Ok(output.clone()),
            Err(message) => Err(TextGenError::ApiError(message.to_string())),
        }
    }
}
