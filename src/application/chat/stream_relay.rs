//! Stream relay: engine chunks to wire-level events.
//!
//! Adapts the completion engine's chunk stream into the ordered event
//! sequence sent to the browser and persists the final text exactly once.
//!
//! # Ordering invariant
//!
//! Zero or more `content` events, then exactly one terminal event (`done`
//! or `error`). Nothing follows the terminal event.
//!
//! # Persistence
//!
//! On success the full accumulated text is appended as one assistant
//! message before `done` is emitted. On error nothing is persisted: the
//! client already rendered whatever deltas it received, and the partial
//! text stays client-side only. Dropping the event stream (client abort)
//! stops forwarding and suppresses persistence.

use futures::{Stream, StreamExt};
use serde::Serialize;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::adapters::ai::CompletionEngine;
use crate::domain::context::ContextAssembler;
use crate::domain::conversation::{Message, SYSTEM_PROMPT};
use crate::domain::foundation::SessionId;
use crate::domain::intent::classify_image_request;
use crate::ports::{CompletionRequest, ConversationStore, DocumentSource};

use super::turn::append_user_turn;
use super::{
    validate_message, ChatError, GenerateImageCommand, GenerateImageHandler, SendMessageCommand,
    TurnParams,
};

/// Channel capacity between the relay task and the transport.
const RELAY_BUFFER: usize = 32;

/// One unit of the server-to-browser event sequence.
///
/// Serialized shapes match the wire contract:
/// `{"content": ...}` | `{"done": true, "sessionId": ...}` | `{"error": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StreamEvent {
    /// A text delta. The client concatenates; the relay never re-sends
    /// the accumulator.
    Content { content: String },
    /// Terminal success; carries the session id so a caller that started
    /// without one learns the generated id.
    Done {
        done: bool,
        #[serde(rename = "sessionId")]
        session_id: SessionId,
    },
    /// Terminal failure with a human-readable message.
    Error { error: String },
}

impl StreamEvent {
    /// Creates a content event.
    pub fn content(delta: impl Into<String>) -> Self {
        Self::Content {
            content: delta.into(),
        }
    }

    /// Creates the terminal done event.
    pub fn done(session_id: SessionId) -> Self {
        Self::Done {
            done: true,
            session_id,
        }
    }

    /// Creates the terminal error event.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    /// Returns true for `done` and `error` events.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Content { .. })
    }
}

/// Event stream returned by [`StreamChatHandler::handle`].
pub type RelayStream = Pin<Box<dyn Stream<Item = StreamEvent> + Send>>;

/// Handler for streaming chat turns.
pub struct StreamChatHandler {
    engine: Arc<CompletionEngine>,
    store: Arc<dyn ConversationStore>,
    documents: Arc<dyn DocumentSource>,
    image_handler: Arc<GenerateImageHandler>,
    assembler: ContextAssembler,
    params: TurnParams,
}

impl StreamChatHandler {
    /// Creates a new handler with the given dependencies.
    pub fn new(
        engine: Arc<CompletionEngine>,
        store: Arc<dyn ConversationStore>,
        documents: Arc<dyn DocumentSource>,
        image_handler: Arc<GenerateImageHandler>,
    ) -> Self {
        Self {
            engine,
            store,
            documents,
            image_handler,
            assembler: ContextAssembler::default(),
            params: TurnParams::default(),
        }
    }

    /// Overrides the per-call completion parameters.
    pub fn with_params(mut self, params: TurnParams) -> Self {
        self.params = params;
        self
    }

    /// Starts one streaming chat turn.
    ///
    /// Failures before the stream opens (validation, store errors on the
    /// user append) are returned as `Err` so the transport can reject the
    /// request outright; everything after that is an event.
    pub async fn handle(&self, cmd: SendMessageCommand) -> Result<RelayStream, ChatError> {
        validate_message(&cmd.content)?;

        // Image-phrased messages run the non-streamed image path and come
        // back as a single content event followed by done.
        if classify_image_request(&cmd.content).is_some() {
            let result = self
                .image_handler
                .handle(GenerateImageCommand {
                    session_id: cmd.session_id,
                    message: cmd.content,
                    style: None,
                })
                .await?;
            let events = vec![
                StreamEvent::content(result.reply.content()),
                StreamEvent::done(result.session_id),
            ];
            return Ok(Box::pin(futures::stream::iter(events)));
        }

        let (session_id, conversation) =
            append_user_turn(&self.store, cmd.session_id, &cmd.content).await?;

        let documents = self.documents.ready_documents(&session_id).await?;
        let context = self.assembler.assemble(&conversation, &documents);
        let request = CompletionRequest::from_context(&context)
            .with_system_prompt(SYSTEM_PROMPT)
            .with_temperature(self.params.temperature)
            .with_max_tokens(self.params.max_tokens);

        let chunks = self.engine.stream(request);
        let store = Arc::clone(&self.store);

        let (tx, rx) = mpsc::channel(RELAY_BUFFER);
        tokio::spawn(async move {
            relay_chunks(chunks, store, session_id, tx).await;
        });

        Ok(Box::pin(futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|event| (event, rx))
        })))
    }
}

/// Forwards engine chunks as events, persisting once on success.
async fn relay_chunks(
    mut chunks: crate::adapters::ai::EngineStream,
    store: Arc<dyn ConversationStore>,
    session_id: SessionId,
    tx: mpsc::Sender<StreamEvent>,
) {
    let mut accumulated = String::new();

    while let Some(item) = chunks.next().await {
        match item {
            Ok(chunk) => {
                if chunk.delta.is_empty() {
                    continue;
                }
                accumulated.push_str(&chunk.delta);
                if tx.send(StreamEvent::content(chunk.delta)).await.is_err() {
                    // Client aborted: stop forwarding, persist nothing.
                    return;
                }
            }
            Err(err) => {
                let _ = tx.send(StreamEvent::error(err.to_string())).await;
                return;
            }
        }
    }

    // A stream that produced no text completes without an assistant turn.
    if !accumulated.is_empty() {
        let persisted = match Message::assistant(&accumulated) {
            Ok(reply) => store.append_message(&session_id, &reply).await,
            Err(err) => Err(err),
        };
        if let Err(err) = persisted {
            tracing::error!(session = %session_id, error = %err, "failed to persist streamed reply");
            let _ = tx
                .send(StreamEvent::error(
                    "Failed to save the response".to_string(),
                ))
                .await;
            return;
        }
    }

    let _ = tx.send(StreamEvent::done(session_id)).await;
}
