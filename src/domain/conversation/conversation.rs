//! Conversation aggregate.
//!
//! A conversation is an append-only sequence of messages owned by a session.
//! Messages are never reordered, mutated in place, or individually deleted;
//! each completed chat turn appends one user and one assistant message.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{SessionId, Timestamp};

use super::message::Message;

/// Maximum characters kept for the conversation title snapshot.
const TITLE_MAX_CHARS: usize = 60;

/// Characters of the newest message surfaced in list views.
const PREVIEW_MAX_CHARS: usize = 100;

/// Append-only conversation history for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    session_id: SessionId,
    title: String,
    messages: Vec<Message>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Conversation {
    /// Starts a new conversation from its first message.
    ///
    /// The title is a snapshot of the first message's content, truncated.
    pub fn start(session_id: SessionId, first_message: Message) -> Self {
        let now = Timestamp::now();
        Self {
            session_id,
            title: title_snapshot(first_message.content()),
            messages: vec![first_message],
            created_at: now,
            updated_at: now,
        }
    }

    /// Reconstitutes a conversation from persistence.
    pub fn reconstitute(
        session_id: SessionId,
        title: String,
        messages: Vec<Message>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            session_id,
            title,
            messages,
            created_at,
            updated_at,
        }
    }

    /// Appends a message to the conversation.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
        self.updated_at = Timestamp::now();
    }

    /// Returns the session id owning this conversation.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Returns the title snapshot.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the number of messages.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns when the conversation was created.
    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns when the conversation last changed.
    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Builds a list-view summary of this conversation.
    pub fn summary(&self) -> ConversationSummary {
        let last_message = self
            .messages
            .last()
            .map(|m| preview(m.content()))
            .unwrap_or_default();

        ConversationSummary {
            session_id: self.session_id,
            title: self.title.clone(),
            message_count: self.messages.len(),
            last_message,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Lightweight conversation view for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub session_id: SessionId,
    pub title: String,
    pub message_count: usize,
    pub last_message: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn title_snapshot(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.chars().count() <= TITLE_MAX_CHARS {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(TITLE_MAX_CHARS).collect();
        format!("{}...", head.trim_end())
    }
}

fn preview(content: &str) -> String {
    content.chars().take(PREVIEW_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::Role;

    fn user(content: &str) -> Message {
        Message::user(content).unwrap()
    }

    fn assistant(content: &str) -> Message {
        Message::assistant(content).unwrap()
    }

    #[test]
    fn start_captures_title_from_first_message() {
        let convo = Conversation::start(SessionId::new(), user("What is borrowing in Rust?"));
        assert_eq!(convo.title(), "What is borrowing in Rust?");
        assert_eq!(convo.message_count(), 1);
    }

    #[test]
    fn start_truncates_long_titles() {
        let long = "x".repeat(200);
        let convo = Conversation::start(SessionId::new(), user(&long));
        assert!(convo.title().chars().count() <= TITLE_MAX_CHARS + 3);
        assert!(convo.title().ends_with("..."));
    }

    #[test]
    fn append_preserves_order() {
        let mut convo = Conversation::start(SessionId::new(), user("first"));
        convo.append(assistant("second"));
        convo.append(user("third"));

        let contents: Vec<&str> = convo.messages().iter().map(|m| m.content()).collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[test]
    fn append_touches_updated_at() {
        let mut convo = Conversation::start(SessionId::new(), user("first"));
        let before = *convo.updated_at();
        std::thread::sleep(std::time::Duration::from_millis(5));
        convo.append(assistant("reply"));
        assert!(convo.updated_at().is_after(&before));
    }

    #[test]
    fn summary_previews_newest_message() {
        let mut convo = Conversation::start(SessionId::new(), user("first"));
        convo.append(assistant(&"y".repeat(300)));

        let summary = convo.summary();
        assert_eq!(summary.message_count, 2);
        assert_eq!(summary.last_message.chars().count(), 100);
    }

    #[test]
    fn reconstitute_preserves_fields() {
        let session_id = SessionId::new();
        let created = Timestamp::now();
        let updated = Timestamp::now();
        let messages = vec![user("hello"), assistant("hi")];

        let convo = Conversation::reconstitute(
            session_id,
            "hello".to_string(),
            messages,
            created,
            updated,
        );

        assert_eq!(convo.session_id(), &session_id);
        assert_eq!(convo.title(), "hello");
        assert_eq!(convo.message_count(), 2);
        assert_eq!(convo.messages()[1].role(), Role::Assistant);
    }
}
