//! Chat application layer: command handlers orchestrating the domain,
//! completion engine, and persistence ports.

mod generate_image;
mod queries;
mod send_message;
mod stream_relay;
mod turn;

pub use generate_image::{GenerateImageCommand, GenerateImageHandler, GenerateImageResult};
pub use queries::{ConversationQueries, CONVERSATION_LIST_LIMIT};
pub use send_message::{SendMessageCommand, SendMessageHandler, SendMessageResult};
pub use stream_relay::{RelayStream, StreamChatHandler, StreamEvent};

use thiserror::Error;

use crate::adapters::ai::CompletionError;
use crate::domain::foundation::DomainError;
use crate::ports::ImageError;

/// Maximum characters accepted for a chat message.
pub const MAX_MESSAGE_CHARS: usize = 10_000;

/// Per-call completion parameters.
///
/// Applied identically to whichever provider serves the call; there are no
/// per-provider overrides.
#[derive(Debug, Clone, Copy)]
pub struct TurnParams {
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for TurnParams {
    fn default() -> Self {
        Self {
            temperature: crate::ports::DEFAULT_TEMPERATURE,
            max_tokens: crate::ports::DEFAULT_MAX_TOKENS,
        }
    }
}

/// Errors surfaced by chat command handlers.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Rejected before any provider call.
    #[error("{0}")]
    Validation(String),

    /// Completion failed on all configured providers.
    #[error(transparent)]
    Providers(#[from] CompletionError),

    /// Image synthesis failed.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// Conversation store failure.
    #[error(transparent)]
    Storage(#[from] DomainError),
}

/// Validates an incoming chat message body.
///
/// Rejection happens before any provider call: empty (after trimming) and
/// oversized messages never leave the process.
pub fn validate_message(content: &str) -> Result<(), ChatError> {
    if content.trim().is_empty() {
        return Err(ChatError::Validation(
            "Message cannot be empty".to_string(),
        ));
    }
    if content.chars().count() > MAX_MESSAGE_CHARS {
        return Err(ChatError::Validation(format!(
            "Message exceeds maximum length of {} characters",
            MAX_MESSAGE_CHARS
        )));
    }
    Ok(())
}
