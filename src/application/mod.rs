//! Application layer - command and query handlers.
//!
//! Orchestrates domain operations across the ports: one handler per
//! operation, each injectable with stub adapters for testing.

pub mod chat;

pub use chat::{
    validate_message, ChatError, ConversationQueries, GenerateImageCommand, GenerateImageHandler,
    GenerateImageResult, RelayStream, SendMessageCommand, SendMessageHandler, SendMessageResult,
    StreamChatHandler, StreamEvent, TurnParams, CONVERSATION_LIST_LIMIT, MAX_MESSAGE_CHARS,
};
