//! Image generation configuration

use serde::Deserialize;
use std::time::Duration;

/// Image generation configuration
///
/// No key means image turns run against the deterministic mock generator,
/// which keeps local development working without credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    /// API key for the image-synthesis service
    pub api_key: Option<String>,

    /// Base URL for the image-synthesis service
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ImageConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a real image service is configured
    pub fn has_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    120
}
