//! Mock image generator for tests and keyless deployments.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::ports::{GeneratedImage, ImageError, ImageGenerator, StylePreset};

/// Deterministic ImageGenerator implementation.
///
/// Returns a synthetic URL derived from the prompt, records every call,
/// and can be armed with an error.
#[derive(Default, Clone)]
pub struct MockImageGenerator {
    error: Option<ImageError>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl MockImageGenerator {
    /// Creates a generator that always succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator that always fails with the given error.
    pub fn failing(error: ImageError) -> Self {
        Self {
            error: Some(error),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns the enhanced prompts passed to generate, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageGenerator for MockImageGenerator {
    async fn generate(
        &self,
        prompt: &str,
        preset: &StylePreset,
    ) -> Result<GeneratedImage, ImageError> {
        let enhanced_prompt = preset.enhance(prompt);
        self.calls.lock().unwrap().push(enhanced_prompt.clone());

        if let Some(err) = &self.error {
            return Err(err.clone());
        }

        let slug: String = prompt
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '-' })
            .collect::<String>()
            .to_lowercase();

        Ok(GeneratedImage {
            url: format!("https://images.example.test/{}.png", slug),
            prompt: prompt.to_string(),
            enhanced_prompt,
            width: preset.width,
            height: preset.height,
            model: preset.model.to_string(),
        })
    }
}
