//! Image-generation turn handler.
//!
//! The image path bypasses the completion engine and stream relay: the
//! extracted prompt goes straight to the image-synthesis collaborator,
//! and the turn persists the user message plus a synthesized assistant
//! message referencing the finished image.

use std::sync::Arc;

use crate::adapters::image::resolve_style;
use crate::domain::conversation::Message;
use crate::domain::foundation::SessionId;
use crate::domain::intent::classify_image_request;
use crate::ports::{ConversationStore, GeneratedImage, ImageGenerator};

use super::turn::append_user_turn;
use super::{validate_message, ChatError};

/// Command to run an image-generation turn.
#[derive(Debug, Clone)]
pub struct GenerateImageCommand {
    /// Session to attach the turn to; minted when absent.
    pub session_id: Option<SessionId>,
    /// The user's message as typed (trigger phrase included, if any).
    pub message: String,
    /// Requested style preset name; unknown names fall back to the default.
    pub style: Option<String>,
}

/// Result of an image-generation turn.
#[derive(Debug, Clone)]
pub struct GenerateImageResult {
    pub session_id: SessionId,
    pub image: GeneratedImage,
    /// The persisted assistant message referencing the image.
    pub reply: Message,
    pub conversation_title: String,
}

/// Handler for image-generation turns.
pub struct GenerateImageHandler {
    store: Arc<dyn ConversationStore>,
    generator: Arc<dyn ImageGenerator>,
}

impl GenerateImageHandler {
    /// Creates a new handler with the given dependencies.
    pub fn new(store: Arc<dyn ConversationStore>, generator: Arc<dyn ImageGenerator>) -> Self {
        Self { store, generator }
    }

    /// Runs one image turn.
    pub async fn handle(
        &self,
        cmd: GenerateImageCommand,
    ) -> Result<GenerateImageResult, ChatError> {
        validate_message(&cmd.message)?;

        // Strip the trigger phrase when present; a direct call to the image
        // endpoint may carry a bare description with no trigger at all.
        let prompt = classify_image_request(&cmd.message)
            .map(|req| req.prompt)
            .unwrap_or_else(|| cmd.message.trim().to_string());

        let preset = resolve_style(cmd.style.as_deref());

        tracing::info!(prompt = %prompt, style = preset.name, "generating image");
        let image = self.generator.generate(&prompt, preset).await?;

        let (session_id, conversation) =
            append_user_turn(&self.store, cmd.session_id, &cmd.message).await?;

        let reply = Message::assistant(format!(
            "Here is the image you asked for:\n\n![{}]({})",
            image.prompt, image.url
        ))?;
        self.store.append_message(&session_id, &reply).await?;

        Ok(GenerateImageResult {
            session_id,
            image,
            reply,
            conversation_title: conversation.title().to_string(),
        })
    }
}
