//! AI provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// AI provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Anthropic API key
    pub anthropic_api_key: Option<String>,

    /// Primary AI provider
    #[serde(default = "default_primary")]
    pub primary_provider: AiProviderKind,

    /// Fallback AI provider; omit for a single-provider deployment
    pub fallback_provider: Option<AiProviderKind>,

    /// Primary model override (provider default when absent)
    pub primary_model: Option<String>,

    /// Fallback model override (provider default when absent)
    pub fallback_model: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Sampling temperature applied per call
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Output token cap applied per call
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProviderKind {
    #[default]
    OpenAI,
    Anthropic,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if OpenAI is configured
    pub fn has_openai(&self) -> bool {
        self.openai_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Anthropic is configured
    pub fn has_anthropic(&self) -> bool {
        self.anthropic_api_key
            .as_ref()
            .is_some_and(|k| !k.is_empty())
    }

    /// Check whether a provider kind has an API key configured
    pub fn has_key_for(&self, kind: AiProviderKind) -> bool {
        match kind {
            AiProviderKind::OpenAI => self.has_openai(),
            AiProviderKind::Anthropic => self.has_anthropic(),
        }
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.has_openai() && !self.has_anthropic() {
            return Err(ValidationError::NoAiProviderConfigured);
        }

        if !self.has_key_for(self.primary_provider) {
            return Err(ValidationError::MissingRequired(
                match self.primary_provider {
                    AiProviderKind::OpenAI => "PARLOR__AI__OPENAI_API_KEY",
                    AiProviderKind::Anthropic => "PARLOR__AI__ANTHROPIC_API_KEY",
                },
            ));
        }

        if let Some(fallback) = self.fallback_provider {
            if fallback == self.primary_provider {
                return Err(ValidationError::DuplicateProviders);
            }
            if !self.has_key_for(fallback) {
                return Err(ValidationError::MissingRequired(match fallback {
                    AiProviderKind::OpenAI => "PARLOR__AI__OPENAI_API_KEY",
                    AiProviderKind::Anthropic => "PARLOR__AI__ANTHROPIC_API_KEY",
                }));
            }
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }

        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            primary_provider: default_primary(),
            fallback_provider: None,
            primary_model: None,
            fallback_model: None,
            timeout_secs: default_timeout(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
        }
    }
}

fn default_primary() -> AiProviderKind {
    AiProviderKind::OpenAI
}

fn default_timeout() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    4096
}
