//! HTTP client for the external image-synthesis service.
//!
//! Calls an OpenAI-compatible images endpoint: one prompt in, one hosted
//! image URL out. No streaming.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{GeneratedImage, ImageError, ImageGenerator, StylePreset};

/// Configuration for the image-synthesis client.
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Base URL for the API (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Request timeout. Rendering is slow; the default is generous.
    pub timeout: Duration,
}

impl SynthesisConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// HTTP image-synthesis client.
pub struct SynthesisClient {
    config: SynthesisConfig,
    client: Client,
}

impl SynthesisClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: SynthesisConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn generations_url(&self) -> String {
        format!("{}/images/generations", self.config.base_url)
    }
}

#[async_trait]
impl ImageGenerator for SynthesisClient {
    async fn generate(
        &self,
        prompt: &str,
        preset: &StylePreset,
    ) -> Result<GeneratedImage, ImageError> {
        let enhanced_prompt = preset.enhance(prompt);

        let request = GenerationRequest {
            model: preset.model.to_string(),
            prompt: enhanced_prompt.clone(),
            n: 1,
            size: format!("{}x{}", preset.width, preset.height),
        };

        let response = self
            .client
            .post(self.generations_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ImageError::Network("request timed out".to_string())
                } else {
                    ImageError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %body, "image generation failed");

            return Err(match status.as_u16() {
                401 => ImageError::AuthenticationFailed,
                400 => ImageError::PromptRejected(format!("status {}", status)),
                500..=599 => ImageError::Unavailable {
                    message: format!("server error {}", status),
                },
                _ => ImageError::Network(format!("unexpected status {}", status)),
            });
        }

        let body: GenerationResponse = response
            .json()
            .await
            .map_err(|e| ImageError::Parse(format!("Failed to parse response: {}", e)))?;

        let image = body
            .data
            .into_iter()
            .next()
            .ok_or_else(|| ImageError::Parse("No image in response".to_string()))?;

        Ok(GeneratedImage {
            url: image.url,
            prompt: prompt.to_string(),
            enhanced_prompt,
            width: preset.width,
            height: preset.height,
            model: preset.model.to_string(),
        })
    }
}

// ----- API Types -----

#[derive(Debug, Serialize)]
struct GenerationRequest {
    model: String,
    prompt: String,
    n: u32,
    size: String,
}

#[derive(Debug, Deserialize)]
struct GenerationResponse {
    data: Vec<GenerationData>,
}

#[derive(Debug, Deserialize)]
struct GenerationData {
    url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder_works() {
        let config = SynthesisConfig::new("test-key")
            .with_base_url("https://custom.api.com")
            .with_timeout(Duration::from_secs(30));

        assert_eq!(config.base_url, "https://custom.api.com");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.api_key(), "test-key");
    }

    #[test]
    fn generations_url_appends_path() {
        let client = SynthesisClient::new(SynthesisConfig::new("k"));
        assert_eq!(
            client.generations_url(),
            "https://api.openai.com/v1/images/generations"
        );
    }
}
