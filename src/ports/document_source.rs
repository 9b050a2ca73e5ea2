//! Document source port.
//!
//! Supplies the parsed text of documents a user uploaded for a session.
//! Upload handling and text extraction happen behind this boundary; the
//! context assembler only ever sees ready, parsed text.

use async_trait::async_trait;

use crate::domain::context::ContextDocument;
use crate::domain::foundation::{DomainError, SessionId};

/// Port for looking up ready, parsed documents by session.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Returns the parsed documents ready for context injection for a
    /// session, in upload order. Sessions without uploads yield an empty
    /// list.
    async fn ready_documents(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<ContextDocument>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_source_is_object_safe() {
        fn _accepts_dyn(_source: &dyn DocumentSource) {}
    }
}
