//! Axum routes for chat endpoints.
//!
//! Defines the routing table for all chat-related HTTP endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    delete_conversation, generate_image, get_conversation, list_conversations, send_message,
    ChatAppState,
};
use super::sse::stream_chat;

/// Creates routes for chat endpoints.
///
/// - POST /chat - blocking chat turn
/// - POST /chat/stream - streaming chat turn (SSE)
/// - GET /conversations - list conversations
/// - GET /conversations/:session_id - fetch one conversation
/// - DELETE /conversations/:session_id - delete one conversation
/// - POST /image - image generation turn
pub fn chat_routes() -> Router<ChatAppState> {
    Router::new()
        .route("/chat", post(send_message))
        .route("/chat/stream", post(stream_chat))
        .route("/conversations", get(list_conversations))
        .route(
            "/conversations/:session_id",
            get(get_conversation).delete(delete_conversation),
        )
        .route("/image", post(generate_image))
}

/// Combined router with all chat routes under /api.
pub fn chat_router() -> Router<ChatAppState> {
    Router::new().nest("/api", chat_routes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_routes_creates_valid_router() {
        let _routes = chat_routes();
    }

    #[test]
    fn chat_router_creates_combined_router() {
        let _router = chat_router();
    }
}
