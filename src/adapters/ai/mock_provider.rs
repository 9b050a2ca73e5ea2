//! Mock AI provider for testing.
//!
//! A configurable implementation of the AiProvider port so tests can run
//! without real upstream calls.
//!
//! # Features
//!
//! - Pre-configured responses, consumed in order
//! - Scripted chunk sequences, including mid-stream failures
//! - Error injection at call time
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let provider = MockAiProvider::new()
//!     .with_response("Hello, I'm the assistant!")
//!     .with_stream_script(vec!["Hel", "lo"], ScriptOutcome::Fail(MockError::Unavailable {
//!         message: "connection reset".into(),
//!     }));
//! ```

use async_trait::async_trait;
use futures::stream;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ports::{
    AiError, AiProvider, ChunkStream, CompletionRequest, CompletionResponse, FinishReason,
    ProviderInfo, StreamChunk,
};

/// Mock AI provider for testing.
#[derive(Debug, Clone)]
pub struct MockAiProvider {
    /// Pre-configured behaviors (consumed in order).
    behaviors: Arc<Mutex<VecDeque<MockBehavior>>>,
    /// Provider info to return.
    info: ProviderInfo,
    /// Call history for verification.
    calls: Arc<Mutex<Vec<CompletionRequest>>>,
}

/// A configured mock behavior.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return a successful completion; streaming splits it into word chunks.
    Success { content: String },
    /// Fail the call up-front (before any chunk on the streaming path).
    Error(MockError),
    /// Streaming path: emit the scripted chunks, then the outcome.
    /// The blocking path joins the chunks and applies the outcome.
    StreamScript {
        chunks: Vec<String>,
        outcome: ScriptOutcome,
    },
}

/// How a scripted stream ends.
#[derive(Debug, Clone)]
pub enum ScriptOutcome {
    /// Finish normally with the given reason.
    Finish(FinishReason),
    /// Fail after the scripted chunks were already emitted.
    Fail(MockError),
}

/// Mock error types for testing error handling.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    Unavailable { message: String },
    AuthenticationFailed,
    Network { message: String },
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AiError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AiError::rate_limited(retry_after_secs),
            MockError::Unavailable { message } => AiError::unavailable(message),
            MockError::AuthenticationFailed => AiError::AuthenticationFailed,
            MockError::Network { message } => AiError::network(message),
            MockError::Timeout { timeout_secs } => AiError::Timeout { timeout_secs },
        }
    }
}

impl Default for MockAiProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAiProvider {
    /// Creates a new mock provider with default settings.
    pub fn new() -> Self {
        Self {
            behaviors: Arc::new(Mutex::new(VecDeque::new())),
            info: ProviderInfo::new("mock", "mock-model-1"),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Adds a successful response to the queue.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        self.push(MockBehavior::Success {
            content: content.into(),
        })
    }

    /// Adds an error response to the queue.
    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockBehavior::Error(error))
    }

    /// Adds a scripted stream to the queue.
    pub fn with_stream_script(
        self,
        chunks: Vec<impl Into<String>>,
        outcome: ScriptOutcome,
    ) -> Self {
        let chunks = chunks.into_iter().map(Into::into).collect();
        self.push(MockBehavior::StreamScript { chunks, outcome })
    }

    /// Sets the provider info.
    pub fn with_provider_info(mut self, info: ProviderInfo) -> Self {
        self.info = info;
        self
    }

    /// Returns the number of calls made to this provider.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded calls.
    pub fn get_calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().unwrap().clone()
    }

    fn push(self, behavior: MockBehavior) -> Self {
        self.behaviors.lock().unwrap().push_back(behavior);
        self
    }

    /// Gets the next behavior or a default success.
    fn next_behavior(&self) -> MockBehavior {
        self.behaviors
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockBehavior::Success {
                content: "Mock response".to_string(),
            })
    }
}

#[async_trait]
impl AiProvider for MockAiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AiError> {
        self.calls.lock().unwrap().push(request);

        match self.next_behavior() {
            MockBehavior::Success { content } => Ok(CompletionResponse {
                content,
                model: self.info.model.clone(),
                finish_reason: FinishReason::Stop,
            }),
            MockBehavior::Error(err) => Err(err.into()),
            MockBehavior::StreamScript { chunks, outcome } => match outcome {
                ScriptOutcome::Finish(reason) => Ok(CompletionResponse {
                    content: chunks.join(""),
                    model: self.info.model.clone(),
                    finish_reason: reason,
                }),
                ScriptOutcome::Fail(err) => Err(err.into()),
            },
        }
    }

    async fn stream_complete(&self, request: CompletionRequest) -> Result<ChunkStream, AiError> {
        self.calls.lock().unwrap().push(request);

        match self.next_behavior() {
            MockBehavior::Success { content } => {
                // Split content into word chunks for streaming simulation.
                let mut items: Vec<Result<StreamChunk, AiError>> = content
                    .split_whitespace()
                    .map(|s| Ok(StreamChunk::content(format!("{} ", s))))
                    .collect();
                items.push(Ok(StreamChunk::final_chunk(FinishReason::Stop)));
                Ok(Box::pin(stream::iter(items)))
            }
            MockBehavior::Error(err) => Err(err.into()),
            MockBehavior::StreamScript { chunks, outcome } => {
                let mut items: Vec<Result<StreamChunk, AiError>> =
                    chunks.into_iter().map(|c| Ok(StreamChunk::content(c))).collect();
                match outcome {
                    ScriptOutcome::Finish(reason) => {
                        items.push(Ok(StreamChunk::final_chunk(reason)));
                    }
                    ScriptOutcome::Fail(err) => {
                        items.push(Err(err.into()));
                    }
                }
                Ok(Box::pin(stream::iter(items)))
            }
        }
    }

    fn provider_info(&self) -> ProviderInfo {
        self.info.clone()
    }
}
