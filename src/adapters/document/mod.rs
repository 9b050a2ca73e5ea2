//! Document adapters: upload validation and the in-memory document source.

mod in_memory;
mod upload;

pub use in_memory::InMemoryDocumentSource;
pub use upload::{
    validate_upload, UploadError, UploadReceipt, UploadStatus, MAX_UPLOAD_BYTES,
};
