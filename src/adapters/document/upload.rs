//! Upload validation at the file-intake boundary.
//!
//! Text extraction itself (PDF/CSV parsing) lives behind the boundary;
//! this module owns the acceptance rules and the receipt shape returned
//! to clients.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{DocumentId, SessionId};

/// Maximum accepted upload size in bytes (10 MB).
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// MIME types accepted for context documents.
const ACCEPTED_TYPES: &[&str] = &["application/pdf", "text/plain", "text/csv", "text/markdown"];

/// Typed rejection codes for uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum UploadError {
    /// File exceeds the size cap.
    #[error("file exceeds the {} byte limit", MAX_UPLOAD_BYTES)]
    FileTooLarge,
    /// File has no content.
    #[error("file is empty")]
    EmptyFile,
    /// MIME type outside the accepted set.
    #[error("unsupported file type")]
    UnsupportedType,
}

/// Processing status of an accepted upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    /// Extraction still running.
    Processing,
    /// Parsed text is available for context injection.
    Ready,
    /// Extraction failed; the document is not injectable.
    Failed,
}

/// Receipt returned for an accepted upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub file_id: DocumentId,
    pub session_id: SessionId,
    pub original_name: String,
    pub mime_type: String,
    pub size_bytes: usize,
    pub word_count: usize,
    pub page_count: usize,
    pub status: UploadStatus,
}

/// Validates an incoming upload against size and type rules.
pub fn validate_upload(mime_type: &str, size_bytes: usize) -> Result<(), UploadError> {
    if size_bytes == 0 {
        return Err(UploadError::EmptyFile);
    }
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(UploadError::FileTooLarge);
    }
    if !ACCEPTED_TYPES.contains(&mime_type) {
        return Err(UploadError::UnsupportedType);
    }
    Ok(())
}

impl UploadReceipt {
    /// Builds a receipt for a validated upload with extracted text stats.
    pub fn for_parsed(
        session_id: SessionId,
        original_name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: usize,
        text: &str,
        page_count: usize,
    ) -> Self {
        Self {
            file_id: DocumentId::new(),
            session_id,
            original_name: original_name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            word_count: text.split_whitespace().count(),
            page_count,
            status: UploadStatus::Ready,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_types_within_limit() {
        assert!(validate_upload("application/pdf", 1024).is_ok());
        assert!(validate_upload("text/plain", 1024).is_ok());
        assert!(validate_upload("text/csv", 1024).is_ok());
        assert!(validate_upload("text/markdown", 1024).is_ok());
    }

    #[test]
    fn rejects_empty_file() {
        assert_eq!(validate_upload("text/plain", 0), Err(UploadError::EmptyFile));
    }

    #[test]
    fn rejects_oversized_file() {
        assert_eq!(
            validate_upload("text/plain", MAX_UPLOAD_BYTES + 1),
            Err(UploadError::FileTooLarge)
        );
    }

    #[test]
    fn accepts_file_at_exact_limit() {
        assert!(validate_upload("text/plain", MAX_UPLOAD_BYTES).is_ok());
    }

    #[test]
    fn rejects_unsupported_type() {
        assert_eq!(
            validate_upload("image/png", 1024),
            Err(UploadError::UnsupportedType)
        );
    }

    #[test]
    fn receipt_counts_words() {
        let receipt = UploadReceipt::for_parsed(
            SessionId::new(),
            "notes.txt",
            "text/plain",
            22,
            "three words here",
            1,
        );

        assert_eq!(receipt.word_count, 3);
        assert_eq!(receipt.page_count, 1);
        assert_eq!(receipt.status, UploadStatus::Ready);
    }

    #[test]
    fn upload_error_serializes_snake_case() {
        let json = serde_json::to_string(&UploadError::FileTooLarge).unwrap();
        assert_eq!(json, "\"file_too_large\"");
    }
}
