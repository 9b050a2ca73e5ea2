//! Blocking chat turn handler.
//!
//! One round trip: validate, route image-phrased messages to the image
//! path, otherwise append the user message, assemble the bounded context,
//! run the completion engine, and persist the assistant reply.

use std::sync::Arc;

use crate::adapters::ai::CompletionEngine;
use crate::domain::context::ContextAssembler;
use crate::domain::conversation::{Message, SYSTEM_PROMPT};
use crate::domain::foundation::SessionId;
use crate::domain::intent::classify_image_request;
use crate::ports::{CompletionRequest, ConversationStore, DocumentSource};

use super::turn::append_user_turn;
use super::{
    validate_message, ChatError, GenerateImageCommand, GenerateImageHandler, TurnParams,
};

/// Command to run one blocking chat turn.
#[derive(Debug, Clone)]
pub struct SendMessageCommand {
    /// Session to attach the turn to; minted when absent.
    pub session_id: Option<SessionId>,
    /// The user's message.
    pub content: String,
    /// Whether the message arrived via voice input. Carried for clients;
    /// the turn itself does not interpret it.
    pub is_voice: bool,
}

/// Result of a completed chat turn.
#[derive(Debug, Clone)]
pub struct SendMessageResult {
    pub session_id: SessionId,
    /// The persisted assistant message.
    pub reply: Message,
    pub conversation_title: String,
}

/// Handler for blocking chat turns.
pub struct SendMessageHandler {
    engine: Arc<CompletionEngine>,
    store: Arc<dyn ConversationStore>,
    documents: Arc<dyn DocumentSource>,
    image_handler: Arc<GenerateImageHandler>,
    assembler: ContextAssembler,
    params: TurnParams,
}

impl SendMessageHandler {
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

    /// Runs one chat turn to completion.
    pub async fn handle(&self, cmd: SendMessageCommand) -> Result<SendMessageResult, ChatError> {
        validate_message(&cmd.content)?;

        // Image-phrased messages bypass the completion engine entirely.
        if classify_image_request(&cmd.content).is_some() {
            let result = self
                .image_handler
                .handle(GenerateImageCommand {
                    session_id: cmd.session_id,
                    message: cmd.content,
                    style: None,
                })
                .await?;
            return Ok(SendMessageResult {
                session_id: result.session_id,
                reply: result.reply,
                conversation_title: result.conversation_title,
            });
        }

        let (session_id, conversation) =
            append_user_turn(&self.store, cmd.session_id, &cmd.content).await?;

        let documents = self.documents.ready_documents(&session_id).await?;
        let context = self.assembler.assemble(&conversation, &documents);

        let request = CompletionRequest::from_context(&context)
            .with_system_prompt(SYSTEM_PROMPT)
            .with_temperature(self.params.temperature)
            .with_max_tokens(self.params.max_tokens);

        tracing::debug!(
            session = %session_id,
            messages = context.len(),
            documents = documents.len(),
            is_voice = cmd.is_voice,
            "running completion"
        );

        let response = self.engine.complete(request).await?;

        let reply = Message::assistant(response.content)?;
        self.store.append_message(&session_id, &reply).await?;

        Ok(SendMessageResult {
            session_id,
            reply,
            conversation_title: conversation.title().to_string(),
        })
    }
}
