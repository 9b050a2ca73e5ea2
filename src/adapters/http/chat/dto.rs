//! HTTP DTOs for chat endpoints.
//!
//! These types decouple the HTTP API from domain types, allowing
//! independent evolution. All wire fields are camelCase.

use serde::{Deserialize, Serialize};

use crate::domain::conversation::{Conversation, ConversationSummary, Message, Role};
use crate::ports::GeneratedImage;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of POST /api/chat and POST /api/chat/stream.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageBody {
    /// User's message text (1-10,000 chars).
    pub message: String,
    /// Session to continue; a new one is minted when absent.
    pub session_id: Option<String>,
    /// Whether the message came from voice input.
    #[serde(default)]
    pub is_voice: bool,
}

/// Body of POST /api/image.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageBody {
    /// The user's message or bare image description.
    pub message: String,
    /// Session to continue; a new one is minted when absent.
    pub session_id: Option<String>,
    /// Style preset name; unknown names fall back to the default preset.
    pub style: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// View of a message for API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageView {
    /// Message ID.
    pub id: String,
    /// Role of the message sender.
    pub role: MessageRoleDto,
    /// Content of the message.
    pub content: String,
    /// When the message was sent (RFC 3339).
    pub timestamp: String,
}

impl MessageView {
    /// Builds a view from a domain message.
    pub fn from_message(message: &Message) -> Self {
        Self {
            id: message.id().to_string(),
            role: message.role().into(),
            content: message.content().to_string(),
            timestamp: message.created_at().to_rfc3339(),
        }
    }
}

/// Role of a message sender on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRoleDto {
    User,
    Assistant,
    System,
}

impl From<Role> for MessageRoleDto {
    fn from(role: Role) -> Self {
        match role {
            Role::User => MessageRoleDto::User,
            Role::Assistant => MessageRoleDto::Assistant,
            Role::System => MessageRoleDto::System,
        }
    }
}

/// Response of POST /api/chat.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageResponse {
    pub success: bool,
    pub session_id: String,
    /// The assistant's reply.
    pub message: MessageView,
    pub conversation_title: String,
}

/// One row of the conversation list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummaryView {
    pub session_id: String,
    pub title: String,
    pub message_count: usize,
    /// First 100 characters of the newest message.
    pub last_message: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ConversationSummaryView {
    /// Builds a view from a domain summary.
    pub fn from_summary(summary: &ConversationSummary) -> Self {
        Self {
            session_id: summary.session_id.to_string(),
            title: summary.title.clone(),
            message_count: summary.message_count,
            last_message: summary.last_message.clone(),
            created_at: summary.created_at.to_rfc3339(),
            updated_at: summary.updated_at.to_rfc3339(),
        }
    }
}

/// Response of GET /api/conversations.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationListResponse {
    pub success: bool,
    pub conversations: Vec<ConversationSummaryView>,
}

/// Response of GET /api/conversations/{sessionId}.
///
/// Unknown sessions answer with an empty messages array, not a 404.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationResponse {
    pub success: bool,
    pub session_id: String,
    pub title: String,
    pub messages: Vec<MessageView>,
}

impl ConversationResponse {
    /// Builds the response for a found conversation.
    pub fn from_conversation(conversation: &Conversation) -> Self {
        Self {
            success: true,
            session_id: conversation.session_id().to_string(),
            title: conversation.title().to_string(),
            messages: conversation
                .messages()
                .iter()
                .map(MessageView::from_message)
                .collect(),
        }
    }

    /// Builds the empty response for an unknown session.
    pub fn empty(session_id: &str) -> Self {
        Self {
            success: true,
            session_id: session_id.to_string(),
            title: String::new(),
            messages: Vec::new(),
        }
    }
}

/// Response of DELETE /api/conversations/{sessionId}.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// View of a generated image.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageView {
    pub url: String,
    pub prompt: String,
    pub enhanced_prompt: String,
    pub width: u32,
    pub height: u32,
    pub model: String,
}

impl ImageView {
    /// Builds a view from a generated image.
    pub fn from_image(image: &GeneratedImage) -> Self {
        Self {
            url: image.url.clone(),
            prompt: image.prompt.clone(),
            enhanced_prompt: image.enhanced_prompt.clone(),
            width: image.width,
            height: image.height,
            model: image.model.clone(),
        }
    }
}

/// Response of POST /api/image.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponse {
    pub success: bool,
    pub session_id: String,
    pub image: ImageView,
    /// The synthesized assistant message referencing the image.
    pub message: MessageView,
}

/// Error body shared by all endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    /// Creates an error response.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;

    #[test]
    fn send_message_body_deserializes_camel_case() {
        let json = r#"{"message": "Hello", "sessionId": "abc", "isVoice": true}"#;
        let body: SendMessageBody = serde_json::from_str(json).unwrap();

        assert_eq!(body.message, "Hello");
        assert_eq!(body.session_id.as_deref(), Some("abc"));
        assert!(body.is_voice);
    }

    #[test]
    fn send_message_body_defaults_optional_fields() {
        let json = r#"{"message": "Hello"}"#;
        let body: SendMessageBody = serde_json::from_str(json).unwrap();

        assert!(body.session_id.is_none());
        assert!(!body.is_voice);
    }

    #[test]
    fn message_view_maps_domain_message() {
        let message = Message::assistant("Hi there").unwrap();
        let view = MessageView::from_message(&message);

        assert_eq!(view.role, MessageRoleDto::Assistant);
        assert_eq!(view.content, "Hi there");
        assert!(!view.timestamp.is_empty());
    }

    #[test]
    fn conversation_response_serializes_camel_case() {
        let convo = Conversation::start(SessionId::new(), Message::user("hello").unwrap());
        let response = ConversationResponse::from_conversation(&convo);

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"sessionId\""));
        assert!(json.contains("\"messages\""));
    }

    #[test]
    fn empty_conversation_response_has_no_messages() {
        let response = ConversationResponse::empty("some-session");
        assert!(response.success);
        assert!(response.messages.is_empty());
    }

    #[test]
    fn error_response_marks_failure() {
        let response = ErrorResponse::new("boom");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("boom"));
    }
}
