//! HTTP handlers for chat endpoints.
//!
//! These handlers connect Axum routes to application layer operations.

use std::sync::Arc;

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::application::chat::{
    ChatError, ConversationQueries, GenerateImageCommand, GenerateImageHandler,
    SendMessageCommand, SendMessageHandler, StreamChatHandler,
};
use crate::domain::foundation::SessionId;

use super::dto::{
    ConversationListResponse, ConversationResponse, ConversationSummaryView, DeleteResponse,
    ErrorResponse, GenerateImageBody, GenerateImageResponse, ImageView, MessageView,
    SendMessageBody, SendMessageResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state for chat handlers.
#[derive(Clone)]
pub struct ChatAppState {
    pub send_handler: Arc<SendMessageHandler>,
    pub stream_handler: Arc<StreamChatHandler>,
    pub image_handler: Arc<GenerateImageHandler>,
    pub queries: Arc<ConversationQueries>,
}

impl ChatAppState {
    /// Creates a new ChatAppState.
    pub fn new(
        send_handler: Arc<SendMessageHandler>,
        stream_handler: Arc<StreamChatHandler>,
        image_handler: Arc<GenerateImageHandler>,
        queries: Arc<ConversationQueries>,
    ) -> Self {
        Self {
            send_handler,
            stream_handler,
            image_handler,
            queries,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Error mapping
// ════════════════════════════════════════════════════════════════════════════════

/// HTTP-level error for chat endpoints.
#[derive(Debug)]
pub enum ChatApiError {
    /// 400 - invalid input.
    BadRequest(String),
    /// 404 - resource absent.
    NotFound(String),
    /// 500 - provider or infrastructure failure. Carries the combined,
    /// user-readable message only; details stay in the logs.
    Internal(String),
}

impl From<ChatError> for ChatApiError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::Validation(message) => ChatApiError::BadRequest(message),
            ChatError::Providers(err) => ChatApiError::Internal(err.to_string()),
            ChatError::Image(err) => ChatApiError::Internal(err.to_string()),
            ChatError::Storage(err) => {
                tracing::error!(error = %err, "conversation store failure");
                ChatApiError::Internal("Failed to access conversation storage".to_string())
            }
        }
    }
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ChatApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ChatApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ChatApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(ErrorResponse::new(message))).into_response()
    }
}

/// Parses an optional session id from the request body.
pub(super) fn parse_session_id(raw: Option<&str>) -> Result<Option<SessionId>, ChatApiError> {
    raw.map(|s| {
        s.parse::<SessionId>()
            .map_err(|_| ChatApiError::BadRequest("Invalid session ID format".to_string()))
    })
    .transpose()
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/chat
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/chat - Run one blocking chat turn.
///
/// # Errors
/// - 400 Bad Request: empty or oversized message, malformed session id
/// - 500 Internal Server Error: both providers failed (combined cause text)
pub async fn send_message(
    State(state): State<ChatAppState>,
    Json(body): Json<SendMessageBody>,
) -> Result<impl IntoResponse, ChatApiError> {
    let session_id = parse_session_id(body.session_id.as_deref())?;

    let result = state
        .send_handler
        .handle(SendMessageCommand {
            session_id,
            content: body.message,
            is_voice: body.is_voice,
        })
        .await?;

    Ok((
        StatusCode::OK,
        Json(SendMessageResponse {
            success: true,
            session_id: result.session_id.to_string(),
            message: MessageView::from_message(&result.reply),
            conversation_title: result.conversation_title,
        }),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /api/conversations
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/conversations - List conversations, newest-updated first.
pub async fn list_conversations(
    State(state): State<ChatAppState>,
) -> Result<impl IntoResponse, ChatApiError> {
    let summaries = state
        .queries
        .list()
        .await
        .map_err(|e| ChatApiError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        Json(ConversationListResponse {
            success: true,
            conversations: summaries
                .iter()
                .map(ConversationSummaryView::from_summary)
                .collect(),
        }),
    ))
}

// ════════════════════════════════════════════════════════════════════════════════
// GET /api/conversations/:session_id
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/conversations/:session_id - Fetch one conversation.
///
/// Unknown sessions answer 200 with an empty messages array so a fresh
/// client can render an empty thread without special-casing.
pub async fn get_conversation(
    State(state): State<ChatAppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ChatApiError> {
    let parsed: SessionId = session_id
        .parse()
        .map_err(|_| ChatApiError::BadRequest("Invalid session ID format".to_string()))?;

    let conversation = state
        .queries
        .fetch(&parsed)
        .await
        .map_err(|e| ChatApiError::Internal(e.to_string()))?;

    let response = match conversation {
        Some(ref conversation) => ConversationResponse::from_conversation(conversation),
        None => ConversationResponse::empty(&session_id),
    };

    Ok((StatusCode::OK, Json(response)))
}

// ════════════════════════════════════════════════════════════════════════════════
// DELETE /api/conversations/:session_id
// ════════════════════════════════════════════════════════════════════════════════

/// DELETE /api/conversations/:session_id - Delete one conversation.
///
/// # Errors
/// - 404 Not Found: no conversation under this session id
pub async fn delete_conversation(
    State(state): State<ChatAppState>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, ChatApiError> {
    let parsed: SessionId = session_id
        .parse()
        .map_err(|_| ChatApiError::BadRequest("Invalid session ID format".to_string()))?;

    let removed = state
        .queries
        .delete(&parsed)
        .await
        .map_err(|e| ChatApiError::Internal(e.to_string()))?;

    if !removed {
        return Err(ChatApiError::NotFound(format!(
            "No conversation for session {}",
            session_id
        )));
    }

    Ok((StatusCode::OK, Json(DeleteResponse { success: true })))
}

// ════════════════════════════════════════════════════════════════════════════════
// POST /api/image
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/image - Generate one image and persist the exchange.
///
/// # Errors
/// - 400 Bad Request: empty or oversized message, malformed session id
/// - 500 Internal Server Error: image service failure
pub async fn generate_image(
    State(state): State<ChatAppState>,
    Json(body): Json<GenerateImageBody>,
) -> Result<impl IntoResponse, ChatApiError> {
    let session_id = parse_session_id(body.session_id.as_deref())?;

    let result = state
        .image_handler
        .handle(GenerateImageCommand {
            session_id,
            message: body.message,
            style: body.style,
        })
        .await?;

    Ok((
        StatusCode::OK,
        Json(GenerateImageResponse {
            success: true,
            session_id: result.session_id.to_string(),
            image: ImageView::from_image(&result.image),
            message: MessageView::from_message(&result.reply),
        }),
    ))
}
