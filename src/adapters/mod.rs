//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - LLM provider clients and the failover engine
//! - `document` - upload validation and the in-memory document source
//! - `http` - Axum handlers, DTOs, and SSE streaming
//! - `image` - image-synthesis client, style presets, mock
//! - `storage` - in-memory conversation store

pub mod ai;
pub mod document;
pub mod http;
pub mod image;
pub mod storage;
