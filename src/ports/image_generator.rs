//! Image generator port.
//!
//! Interface to the external image-synthesis collaborator. The image path
//! bypasses the completion engine entirely: one prompt in, one finished
//! image out, no streaming.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A named rendering style applied to image prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StylePreset {
    /// Preset name clients select by (e.g., "photographic").
    pub name: &'static str,
    /// Suffix appended to the user prompt to steer the renderer.
    pub prompt_suffix: &'static str,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Model identifier the preset renders with.
    pub model: &'static str,
}

impl StylePreset {
    /// Builds the enhanced prompt submitted to the renderer.
    pub fn enhance(&self, prompt: &str) -> String {
        if self.prompt_suffix.is_empty() {
            prompt.to_string()
        } else {
            format!("{}, {}", prompt, self.prompt_suffix)
        }
    }
}

/// A single synthesized image result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    /// Where the rendered image can be fetched.
    pub url: String,
    /// The prompt as the user phrased it.
    pub prompt: String,
    /// The prompt after style enhancement.
    pub enhanced_prompt: String,
    pub width: u32,
    pub height: u32,
    /// Model that rendered the image.
    pub model: String,
}

/// Port for image synthesis.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Renders one image for the prompt under the given style preset.
    async fn generate(
        &self,
        prompt: &str,
        preset: &StylePreset,
    ) -> Result<GeneratedImage, ImageError>;
}

/// Image synthesis errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ImageError {
    /// Renderer rejected the prompt.
    #[error("prompt rejected: {0}")]
    PromptRejected(String),

    /// Renderer is unavailable.
    #[error("image service unavailable: {message}")]
    Unavailable { message: String },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse renderer response.
    #[error("parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enhance_appends_suffix() {
        let preset = StylePreset {
            name: "test",
            prompt_suffix: "oil painting",
            width: 512,
            height: 512,
            model: "test-model",
        };
        assert_eq!(preset.enhance("a lighthouse"), "a lighthouse, oil painting");
    }

    #[test]
    fn enhance_with_empty_suffix_passes_prompt_through() {
        let preset = StylePreset {
            name: "plain",
            prompt_suffix: "",
            width: 512,
            height: 512,
            model: "test-model",
        };
        assert_eq!(preset.enhance("a lighthouse"), "a lighthouse");
    }

    #[test]
    fn image_generator_is_object_safe() {
        fn _accepts_dyn(_gen: &dyn ImageGenerator) {}
    }
}
