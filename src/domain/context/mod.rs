//! Context assembly: bounded history windows and document injection.

mod assembler;
mod document;

pub use assembler::{ContextAssembler, ContextMessage, DOCUMENT_CHAR_BUDGET, HISTORY_WINDOW};
pub use document::{truncate_head_tail, ContextDocument};
