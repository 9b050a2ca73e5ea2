//! Conversation store port.
//!
//! Defines the contract for persisting and retrieving conversations. The
//! store is an opaque collaborator: the core only loads a conversation by
//! session id, appends messages, and reads summaries.
//!
//! # Design
//!
//! - **Append-only**: messages are never reordered or mutated in place
//! - **Session-scoped**: one conversation per session id
//! - **Serialized writes**: implementations must serialize appends per
//!   session id so concurrent turns interleave instead of losing writes

use async_trait::async_trait;

use crate::domain::conversation::{Conversation, ConversationSummary, Message};
use crate::domain::foundation::{DomainError, SessionId};

/// Repository port for conversation persistence.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Finds a conversation by session id.
    ///
    /// Returns `None` if no conversation exists for the session.
    async fn find(&self, session_id: &SessionId) -> Result<Option<Conversation>, DomainError>;

    /// Saves a conversation, creating it if absent.
    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError>;

    /// Appends a message to an existing conversation.
    ///
    /// # Errors
    ///
    /// - `ConversationNotFound` if the session has no conversation
    /// - `StorageError` on persistence failure
    async fn append_message(
        &self,
        session_id: &SessionId,
        message: &Message,
    ) -> Result<(), DomainError>;

    /// Lists conversation summaries, newest-updated first, capped at `limit`.
    async fn list_summaries(&self, limit: usize)
        -> Result<Vec<ConversationSummary>, DomainError>;

    /// Deletes a conversation.
    ///
    /// Returns `true` if a conversation was removed, `false` if none existed.
    async fn delete(&self, session_id: &SessionId) -> Result<bool, DomainError>;
}
