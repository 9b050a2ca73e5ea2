//! HTTP chat adapter: DTOs, handlers, SSE streaming, and routes.

pub mod dto;
pub mod handlers;
pub mod routes;
pub mod sse;

pub use handlers::{ChatApiError, ChatAppState};
pub use routes::{chat_router, chat_routes};
