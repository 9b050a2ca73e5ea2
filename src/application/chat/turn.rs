//! Shared turn plumbing for the chat and image handlers.

use std::sync::Arc;

use crate::domain::conversation::{Conversation, Message};
use crate::domain::foundation::{DomainError, SessionId};
use crate::ports::ConversationStore;

/// Appends the user's message to its conversation, creating the
/// conversation on first contact with a session id.
///
/// Returns the session id (minted when the caller supplied none) and the
/// conversation as of this turn, including the new user message.
pub(super) async fn append_user_turn(
    store: &Arc<dyn ConversationStore>,
    session_id: Option<SessionId>,
    content: &str,
) -> Result<(SessionId, Conversation), DomainError> {
    let user_message = Message::user(content)?;

    if let Some(session_id) = session_id {
        if let Some(mut conversation) = store.find(&session_id).await? {
            store.append_message(&session_id, &user_message).await?;
            conversation.append(user_message);
            return Ok((session_id, conversation));
        }
    }

    let session_id = session_id.unwrap_or_default();
    let conversation = Conversation::start(session_id, user_message);
    store.save(&conversation).await?;
    Ok((session_id, conversation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemoryConversationStore;

    fn store() -> Arc<dyn ConversationStore> {
        Arc::new(InMemoryConversationStore::new())
    }

    #[tokio::test]
    async fn missing_session_id_mints_one_and_creates_conversation() {
        let store = store();

        let (session_id, conversation) = append_user_turn(&store, None, "hello").await.unwrap();

        assert_eq!(conversation.message_count(), 1);
        let stored = store.find(&session_id).await.unwrap().unwrap();
        assert_eq!(stored.message_count(), 1);
    }

    #[tokio::test]
    async fn unknown_session_id_creates_conversation_under_it() {
        let store = store();
        let session_id = SessionId::new();

        let (returned, _) = append_user_turn(&store, Some(session_id), "hello")
            .await
            .unwrap();

        assert_eq!(returned, session_id);
        assert!(store.find(&session_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn existing_session_appends_to_history() {
        let store = store();
        let (session_id, _) = append_user_turn(&store, None, "first").await.unwrap();

        let (_, conversation) = append_user_turn(&store, Some(session_id), "second")
            .await
            .unwrap();

        assert_eq!(conversation.message_count(), 2);
        assert_eq!(conversation.messages()[1].content(), "second");
        let stored = store.find(&session_id).await.unwrap().unwrap();
        assert_eq!(stored.message_count(), 2);
    }
}
