//! Context assembly for completion requests.
//!
//! Builds the ordered message list submitted to the completion engine:
//! trims conversation history to a bounded window and, when parsed
//! documents exist for the session, prepends their text to the first user
//! turn of the window.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::{Conversation, Role};

use super::document::{truncate_head_tail, ContextDocument};

/// Number of most-recent messages submitted per completion call.
///
/// Older history is silently dropped; there is no summarization.
pub const HISTORY_WINDOW: usize = 20;

/// Per-document character budget before head/tail truncation kicks in.
pub const DOCUMENT_CHAR_BUDGET: usize = 8_000;

/// A provider-agnostic `{role, content}` pair ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: Role,
    pub content: String,
}

impl ContextMessage {
    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Assembles the bounded message list for a completion call.
///
/// The assembler never mutates the source conversation; it copies the
/// window and rewrites only the first entry's content when injecting
/// document context.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    window: usize,
    document_budget: usize,
}

impl ContextAssembler {
    /// Creates an assembler with explicit window and document budgets.
    pub fn new(window: usize, document_budget: usize) -> Self {
        Self {
            window,
            document_budget,
        }
    }

    /// Builds the submission list from a conversation and its documents.
    ///
    /// Document context rides with user intent: the prefix block is
    /// prepended only when the first retained message is a user message.
    /// A window that happens to start on an assistant message is submitted
    /// without injection.
    pub fn assemble(
        &self,
        conversation: &Conversation,
        documents: &[ContextDocument],
    ) -> Vec<ContextMessage> {
        let messages = conversation.messages();
        let start = messages.len().saturating_sub(self.window);

        let mut out: Vec<ContextMessage> = messages[start..]
            .iter()
            .map(|m| ContextMessage {
                role: m.role(),
                content: m.content().to_string(),
            })
            .collect();

        if !documents.is_empty() {
            if let Some(first) = out.first_mut() {
                if first.role == Role::User {
                    let prefix = self.document_prefix(documents);
                    first.content = format!("{}{}", prefix, first.content);
                }
            }
        }

        out
    }

    /// Concatenates all documents into a single deterministic prefix block.
    fn document_prefix(&self, documents: &[ContextDocument]) -> String {
        let mut block =
            String::from("The user has uploaded the following documents as context:\n");
        for doc in documents {
            block.push_str("\n--- ");
            block.push_str(&doc.name);
            block.push_str(" ---\n");
            block.push_str(&truncate_head_tail(&doc.text, self.document_budget));
            block.push('\n');
        }
        block.push('\n');
        block
    }
}

impl Default for ContextAssembler {
    fn default() -> Self {
        Self::new(HISTORY_WINDOW, DOCUMENT_CHAR_BUDGET)
    }
}
