//! In-memory document source.
//!
//! Holds parsed document text per session. Upload handling registers
//! documents here once extraction finishes; the context assembler reads
//! them through the DocumentSource port.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::context::ContextDocument;
use crate::domain::foundation::{DomainError, SessionId};
use crate::ports::DocumentSource;

/// In-memory DocumentSource implementation.
#[derive(Default)]
pub struct InMemoryDocumentSource {
    documents: RwLock<HashMap<SessionId, Vec<ContextDocument>>>,
}

impl InMemoryDocumentSource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a parsed document for a session, preserving upload order.
    pub async fn add_document(&self, session_id: SessionId, document: ContextDocument) {
        self.documents
            .write()
            .await
            .entry(session_id)
            .or_default()
            .push(document);
    }

    /// Drops all documents for a session.
    pub async fn clear_session(&self, session_id: &SessionId) {
        self.documents.write().await.remove(session_id);
    }
}

#[async_trait]
impl DocumentSource for InMemoryDocumentSource {
    async fn ready_documents(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<ContextDocument>, DomainError> {
        Ok(self
            .documents
            .read()
            .await
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }
}
