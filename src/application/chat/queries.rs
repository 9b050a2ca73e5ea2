//! Conversation query and delete handlers.

use std::sync::Arc;

use crate::domain::conversation::{Conversation, ConversationSummary};
use crate::domain::foundation::{DomainError, SessionId};
use crate::ports::ConversationStore;

/// Maximum conversations returned by the list endpoint.
pub const CONVERSATION_LIST_LIMIT: usize = 50;

/// Read-side operations over the conversation store.
pub struct ConversationQueries {
    store: Arc<dyn ConversationStore>,
}

impl ConversationQueries {
    /// Creates new queries over the given store.
    pub fn new(store: Arc<dyn ConversationStore>) -> Self {
        Self { store }
    }

    /// Lists conversation summaries, newest-updated first, capped.
    pub async fn list(&self) -> Result<Vec<ConversationSummary>, DomainError> {
        self.store.list_summaries(CONVERSATION_LIST_LIMIT).await
    }

    /// Fetches a conversation by session id.
    ///
    /// Unknown sessions yield `None`; the HTTP layer renders that as an
    /// empty messages array rather than a 404.
    pub async fn fetch(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<Conversation>, DomainError> {
        self.store.find(session_id).await
    }

    /// Deletes a conversation. Returns whether one existed.
    pub async fn delete(&self, session_id: &SessionId) -> Result<bool, DomainError> {
        self.store.delete(session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryConversationStore;
    use crate::domain::conversation::Message;

    fn queries_with_store() -> (ConversationQueries, Arc<dyn ConversationStore>) {
        let store: Arc<dyn ConversationStore> = Arc::new(InMemoryConversationStore::new());
        (ConversationQueries::new(Arc::clone(&store)), store)
    }

    #[tokio::test]
    async fn list_caps_at_limit() {
        let (queries, store) = queries_with_store();
        for i in 0..(CONVERSATION_LIST_LIMIT + 10) {
            let convo = Conversation::start(
                SessionId::new(),
                Message::user(format!("conversation {}", i)).unwrap(),
            );
            store.save(&convo).await.unwrap();
        }

        let summaries = queries.list().await.unwrap();

        assert_eq!(summaries.len(), CONVERSATION_LIST_LIMIT);
    }

    #[tokio::test]
    async fn fetch_unknown_session_returns_none() {
        let (queries, _) = queries_with_store();
        assert!(queries.fetch(&SessionId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_reports_whether_conversation_existed() {
        let (queries, store) = queries_with_store();
        let convo = Conversation::start(SessionId::new(), Message::user("hi").unwrap());
        let session_id = *convo.session_id();
        store.save(&convo).await.unwrap();

        assert!(queries.delete(&session_id).await.unwrap());
        assert!(!queries.delete(&session_id).await.unwrap());
    }
}
