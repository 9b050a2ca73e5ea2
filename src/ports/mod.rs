//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AiProvider` - blocking + streaming LLM completions
//! - `ConversationStore` - opaque conversation persistence
//! - `DocumentSource` - parsed upload text for context injection
//! - `ImageGenerator` - external image-synthesis collaborator

mod ai_provider;
mod conversation_store;
mod document_source;
mod image_generator;

pub use ai_provider::{
    AiError, AiProvider, ChunkStream, CompletionRequest, CompletionResponse, FinishReason,
    MessageRole, ProviderInfo, ProviderMessage, StreamChunk, DEFAULT_MAX_TOKENS,
    DEFAULT_TEMPERATURE,
};
pub use conversation_store::ConversationStore;
pub use document_source::DocumentSource;
pub use image_generator::{GeneratedImage, ImageError, ImageGenerator, StylePreset};
