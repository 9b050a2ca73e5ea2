//! Parlor - Streaming AI chat backend.
//!
//! Routes chat turns through a primary/fallback pair of LLM providers,
//! streams replies to the browser over SSE, and keeps append-only
//! conversation history behind a store port.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
