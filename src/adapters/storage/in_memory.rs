//! In-memory conversation store.
//!
//! Process-local implementation of the ConversationStore port. Suitable for
//! tests and single-node deployments; the conversation map lives behind one
//! async RwLock, so appends for a session are serialized and concurrent
//! turns interleave at message granularity instead of losing writes.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::conversation::{Conversation, ConversationSummary, Message};
use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::ports::ConversationStore;

/// In-memory ConversationStore implementation.
#[derive(Default)]
pub struct InMemoryConversationStore {
    conversations: RwLock<HashMap<SessionId, Conversation>>,
}

impl InMemoryConversationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored conversations.
    pub async fn len(&self) -> usize {
        self.conversations.read().await.len()
    }

    /// Returns true if no conversations are stored.
    pub async fn is_empty(&self) -> bool {
        self.conversations.read().await.is_empty()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn find(&self, session_id: &SessionId) -> Result<Option<Conversation>, DomainError> {
        Ok(self.conversations.read().await.get(session_id).cloned())
    }

    async fn save(&self, conversation: &Conversation) -> Result<(), DomainError> {
        self.conversations
            .write()
            .await
            .insert(*conversation.session_id(), conversation.clone());
        Ok(())
    }

    async fn append_message(
        &self,
        session_id: &SessionId,
        message: &Message,
    ) -> Result<(), DomainError> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations.get_mut(session_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::ConversationNotFound,
                format!("No conversation for session {}", session_id),
            )
        })?;
        conversation.append(message.clone());
        Ok(())
    }

    async fn list_summaries(
        &self,
        limit: usize,
    ) -> Result<Vec<ConversationSummary>, DomainError> {
        let conversations = self.conversations.read().await;
        let mut summaries: Vec<ConversationSummary> =
            conversations.values().map(|c| c.summary()).collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        summaries.truncate(limit);
        Ok(summaries)
    }

    async fn delete(&self, session_id: &SessionId) -> Result<bool, DomainError> {
        Ok(self
            .conversations
            .write()
            .await
            .remove(session_id)
            .is_some())
    }
}
