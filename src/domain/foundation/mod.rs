//! Shared domain primitives: identifiers, timestamps, and error types.

mod errors;
mod ids;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{DocumentId, SessionId};
pub use timestamp::Timestamp;
