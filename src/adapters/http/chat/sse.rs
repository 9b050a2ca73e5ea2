//! SSE endpoint for streaming chat turns.
//!
//! Each relay event is sent as one `data:` line of JSON matching the
//! StreamEvent union. The transport closes after the terminal event;
//! aborting the connection drops the stream and cancels the turn.

use axum::extract::{Json, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};
use std::convert::Infallible;

use crate::application::chat::{SendMessageCommand, StreamEvent};

use super::dto::SendMessageBody;
use super::handlers::{parse_session_id, ChatApiError, ChatAppState};

/// POST /api/chat/stream - Run one chat turn, streaming the reply.
///
/// # Errors
/// - 400 Bad Request: empty or oversized message, malformed session id
///
/// Provider failures after the stream opens arrive as a terminal
/// `{"error": ...}` event rather than an HTTP status.
pub async fn stream_chat(
    State(state): State<ChatAppState>,
    Json(body): Json<SendMessageBody>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ChatApiError> {
    let session_id = parse_session_id(body.session_id.as_deref())?;

    let relay = state
        .stream_handler
        .handle(SendMessageCommand {
            session_id,
            content: body.message,
            is_voice: body.is_voice,
        })
        .await?;

    let events = relay.map(|event| Ok(to_sse_event(&event)));

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

/// Encodes a relay event as one SSE data frame.
fn to_sse_event(event: &StreamEvent) -> Event {
    let payload = serde_json::to_string(event)
        .unwrap_or_else(|_| r#"{"error":"Event serialization failed"}"#.to_string());
    Event::default().data(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SessionId;

    #[test]
    fn content_event_encodes_as_json_data() {
        let event = to_sse_event(&StreamEvent::content("Hel"));
        let rendered = format!("{:?}", event);
        assert!(rendered.contains("content"));
    }

    #[test]
    fn done_event_carries_session_id() {
        let session_id = SessionId::new();
        let payload = serde_json::to_string(&StreamEvent::done(session_id)).unwrap();
        assert!(payload.contains(&session_id.to_string()));
        assert!(payload.contains("\"done\":true"));
    }
}
