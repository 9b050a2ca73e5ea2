//! Image-synthesis adapters: style presets, the HTTP client, and a mock.

mod mock_generator;
mod styles;
mod synthesis_client;

pub use mock_generator::MockImageGenerator;
pub use styles::{resolve_style, style_names, DEFAULT_STYLE};
pub use synthesis_client::{SynthesisClient, SynthesisConfig};
