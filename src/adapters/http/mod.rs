//! HTTP adapters exposing the application over Axum.

pub mod chat;
