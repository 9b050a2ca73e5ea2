//! Completion engine with automatic provider failover.
//!
//! Wraps a PRIMARY and an optional FALLBACK provider behind one interface.
//! The engine is provider-agnostic: adapters own the wire formats, the
//! engine owns the failover policy.
//!
//! # Failover policy
//!
//! - Blocking: call PRIMARY; on any failure, call FALLBACK with the
//!   identical message list and system prompt. If FALLBACK also fails,
//!   surface one combined error naming both causes. No further retries.
//! - Streaming: forward PRIMARY deltas as they arrive. If PRIMARY fails
//!   before anything was forwarded, restart transparently on FALLBACK. If
//!   PRIMARY fails after forwarding began, do not switch providers
//!   mid-response; surface the error after the chunks already delivered.
//!
//! The two-tier chain is deliberate: an interactive chat stream needs
//! bounded latency, so there is exactly one fallback hop and nothing else.

use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::ports::{AiError, AiProvider, CompletionRequest, CompletionResponse, StreamChunk};

/// Channel capacity between the driver task and the consumer.
const STREAM_BUFFER: usize = 32;

/// Chunk stream yielded by [`CompletionEngine::stream`].
pub type EngineStream = Pin<Box<dyn Stream<Item = Result<StreamChunk, CompletionError>> + Send>>;

/// Errors surfaced by the completion engine.
///
/// Causes are the providers' short reason strings; raw upstream bodies
/// never cross this boundary.
#[derive(Debug, Clone, Error)]
pub enum CompletionError {
    /// Both providers failed before producing output.
    #[error("all providers failed (primary {primary_name}: {primary_cause}; fallback {fallback_name}: {fallback_cause})")]
    AllProvidersFailed {
        primary_name: String,
        primary_cause: String,
        fallback_name: String,
        fallback_cause: String,
    },

    /// The only configured provider failed before producing output.
    #[error("provider {provider} failed: {cause}")]
    ProviderFailed { provider: String, cause: String },

    /// A stream failed after deltas were already delivered; the partial
    /// text stays with the consumer and no provider switch happens.
    #[error("{provider} stream interrupted mid-response: {cause}")]
    StreamInterrupted { provider: String, cause: String },
}

/// Completion engine over a primary and optional fallback provider.
///
/// Providers are injected as trait objects so tests can substitute stub
/// adapters; the engine never references a concrete provider.
#[derive(Clone)]
pub struct CompletionEngine {
    primary: Arc<dyn AiProvider>,
    fallback: Option<Arc<dyn AiProvider>>,
}

impl CompletionEngine {
    /// Creates an engine with only a primary provider.
    pub fn new(primary: Arc<dyn AiProvider>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    /// Adds a fallback provider.
    pub fn with_fallback(mut self, fallback: Arc<dyn AiProvider>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Generates a blocking completion with single-hop failover.
    pub async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, CompletionError> {
        let primary_name = self.primary.provider_info().name;

        let primary_err = match self.primary.complete(request.clone()).await {
            Ok(response) => return Ok(response),
            Err(err) => err,
        };

        let Some(fallback) = &self.fallback else {
            tracing::error!(provider = %primary_name, error = %primary_err, "provider failed, no fallback configured");
            return Err(CompletionError::ProviderFailed {
                provider: primary_name,
                cause: primary_err.to_string(),
            });
        };

        let fallback_name = fallback.provider_info().name;
        tracing::warn!(
            primary = %primary_name,
            fallback = %fallback_name,
            error = %primary_err,
            "primary provider failed, falling back"
        );

        match fallback.complete(request).await {
            Ok(response) => Ok(response),
            Err(fallback_err) => {
                tracing::error!(
                    primary = %primary_name,
                    fallback = %fallback_name,
                    primary_error = %primary_err,
                    fallback_error = %fallback_err,
                    "both providers failed"
                );
                Err(CompletionError::AllProvidersFailed {
                    primary_name,
                    primary_cause: primary_err.to_string(),
                    fallback_name,
                    fallback_cause: fallback_err.to_string(),
                })
            }
        }
    }

    /// Generates a streaming completion with pre-delta failover.
    ///
    /// The returned stream yields zero or more chunks followed by at most
    /// one error. Dropping the stream stops the drive loop at the next
    /// send, which is how callers cancel an in-flight turn.
    pub fn stream(&self, request: CompletionRequest) -> EngineStream {
        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let primary = Arc::clone(&self.primary);
        let fallback = self.fallback.clone();

        tokio::spawn(async move {
            drive_stream(primary, fallback, request, tx).await;
        });

        Box::pin(futures::stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        }))
    }
}

/// Drives the provider streams, applying the failover policy.
async fn drive_stream(
    primary: Arc<dyn AiProvider>,
    fallback: Option<Arc<dyn AiProvider>>,
    request: CompletionRequest,
    tx: mpsc::Sender<Result<StreamChunk, CompletionError>>,
) {
    let primary_name = primary.provider_info().name;

    let primary_err = match forward_provider_stream(&*primary, request.clone(), &tx).await {
        ForwardOutcome::Completed | ForwardOutcome::ConsumerGone => return,
        ForwardOutcome::FailedAfterDelivery(err) => {
            // Partial output already reached the consumer; switching
            // providers now would splice two unrelated responses.
            tracing::warn!(provider = %primary_name, error = %err, "stream interrupted mid-response");
            let _ = tx
                .send(Err(CompletionError::StreamInterrupted {
                    provider: primary_name,
                    cause: err.to_string(),
                }))
                .await;
            return;
        }
        ForwardOutcome::FailedBeforeDelivery(err) => err,
    };

    let Some(fallback) = fallback else {
        tracing::error!(provider = %primary_name, error = %primary_err, "stream failed, no fallback configured");
        let _ = tx
            .send(Err(CompletionError::ProviderFailed {
                provider: primary_name,
                cause: primary_err.to_string(),
            }))
            .await;
        return;
    };

    let fallback_name = fallback.provider_info().name;
    tracing::warn!(
        primary = %primary_name,
        fallback = %fallback_name,
        error = %primary_err,
        "primary stream failed before first delta, restarting on fallback"
    );

    match forward_provider_stream(&*fallback, request, &tx).await {
        ForwardOutcome::Completed | ForwardOutcome::ConsumerGone => {}
        ForwardOutcome::FailedAfterDelivery(err) => {
            let _ = tx
                .send(Err(CompletionError::StreamInterrupted {
                    provider: fallback_name,
                    cause: err.to_string(),
                }))
                .await;
        }
        ForwardOutcome::FailedBeforeDelivery(err) => {
            tracing::error!(
                primary = %primary_name,
                fallback = %fallback_name,
                primary_error = %primary_err,
                fallback_error = %err,
                "both providers failed"
            );
            let _ = tx
                .send(Err(CompletionError::AllProvidersFailed {
                    primary_name,
                    primary_cause: primary_err.to_string(),
                    fallback_name,
                    fallback_cause: err.to_string(),
                }))
                .await;
        }
    }
}

/// Result of forwarding one provider's stream to the consumer.
enum ForwardOutcome {
    /// The stream ran to completion.
    Completed,
    /// The consumer dropped the stream; stop silently.
    ConsumerGone,
    /// The provider failed before any chunk reached the consumer.
    FailedBeforeDelivery(AiError),
    /// The provider failed after chunks were already delivered.
    FailedAfterDelivery(AiError),
}

async fn forward_provider_stream(
    provider: &dyn AiProvider,
    request: CompletionRequest,
    tx: &mpsc::Sender<Result<StreamChunk, CompletionError>>,
) -> ForwardOutcome {
    let mut chunks = match provider.stream_complete(request).await {
        Ok(chunks) => chunks,
        Err(err) => return ForwardOutcome::FailedBeforeDelivery(err),
    };

    let mut delivered = false;
    loop {
        match chunks.next().await {
            Some(Ok(chunk)) => {
                if tx.send(Ok(chunk)).await.is_err() {
                    return ForwardOutcome::ConsumerGone;
                }
                delivered = true;
            }
            Some(Err(err)) => {
                return if delivered {
                    ForwardOutcome::FailedAfterDelivery(err)
                } else {
                    ForwardOutcome::FailedBeforeDelivery(err)
                };
            }
            None => return ForwardOutcome::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAiProvider, MockError, ScriptOutcome};
    use crate::ports::{FinishReason, MessageRole, ProviderInfo};

    fn request() -> CompletionRequest {
        CompletionRequest::new().with_message(MessageRole::User, "Hello")
    }

    fn unavailable() -> MockError {
        MockError::Unavailable {
            message: "service down".to_string(),
        }
    }

    fn engine_with(primary: MockAiProvider, fallback: MockAiProvider) -> CompletionEngine {
        CompletionEngine::new(Arc::new(primary)).with_fallback(Arc::new(fallback))
    }

    async fn collect(mut stream: EngineStream) -> Vec<Result<StreamChunk, CompletionError>> {
        let mut items = Vec::new();
        while let Some(item) = stream.next().await {
            items.push(item);
        }
        items
    }

    mod blocking {
        use super::*;

        #[tokio::test]
        async fn primary_success_skips_fallback() {
            let primary = MockAiProvider::new().with_response("Hi there!");
            let fallback = MockAiProvider::new().with_response("Fallback response");
            let engine = engine_with(primary, fallback.clone());

            let response = engine.complete(request()).await.unwrap();

            assert_eq!(response.content, "Hi there!");
            assert_eq!(fallback.call_count(), 0);
        }

        #[tokio::test]
        async fn any_primary_failure_triggers_fallback() {
            let primary = MockAiProvider::new().with_error(MockError::AuthenticationFailed);
            let fallback = MockAiProvider::new().with_response("Fallback response");
            let engine = engine_with(primary, fallback);

            let response = engine.complete(request()).await.unwrap();

            assert_eq!(response.content, "Fallback response");
        }

        #[tokio::test]
        async fn fallback_receives_identical_messages() {
            let primary = MockAiProvider::new().with_error(unavailable());
            let fallback = MockAiProvider::new().with_response("ok");
            let engine = engine_with(primary.clone(), fallback.clone());

            let req = request().with_system_prompt("Be helpful");
            engine.complete(req).await.unwrap();

            let primary_calls = primary.get_calls();
            let fallback_calls = fallback.get_calls();
            assert_eq!(primary_calls[0].messages, fallback_calls[0].messages);
            assert_eq!(
                fallback_calls[0].system_prompt,
                Some("Be helpful".to_string())
            );
        }

        #[tokio::test]
        async fn both_failing_yields_combined_error() {
            let primary = MockAiProvider::new()
                .with_provider_info(ProviderInfo::new("openai", "gpt-4o"))
                .with_error(MockError::RateLimited {
                    retry_after_secs: 30,
                });
            let fallback = MockAiProvider::new()
                .with_provider_info(ProviderInfo::new("anthropic", "claude"))
                .with_error(unavailable());
            let engine = engine_with(primary, fallback);

            let err = engine.complete(request()).await.unwrap_err();

            let message = err.to_string();
            assert!(message.contains("openai"));
            assert!(message.contains("anthropic"));
            assert!(message.contains("rate limited"));
            assert!(message.contains("service down"));
        }

        #[tokio::test]
        async fn no_fallback_configured_surfaces_provider_error() {
            let primary = MockAiProvider::new().with_error(unavailable());
            let engine = CompletionEngine::new(Arc::new(primary));

            let err = engine.complete(request()).await.unwrap_err();

            assert!(matches!(err, CompletionError::ProviderFailed { .. }));
        }

        #[tokio::test]
        async fn exactly_one_fallback_hop() {
            let primary = MockAiProvider::new().with_error(unavailable());
            let fallback = MockAiProvider::new().with_error(unavailable());
            let engine = engine_with(primary.clone(), fallback.clone());

            let _ = engine.complete(request()).await;

            assert_eq!(primary.call_count(), 1);
            assert_eq!(fallback.call_count(), 1);
        }
    }

    mod streaming {
        use super::*;

        #[tokio::test]
        async fn healthy_primary_streams_through() {
            let primary = MockAiProvider::new()
                .with_stream_script(vec!["Hel", "lo"], ScriptOutcome::Finish(FinishReason::Stop));
            let fallback = MockAiProvider::new();
            let engine = engine_with(primary, fallback.clone());

            let items = collect(engine.stream(request())).await;

            let deltas: Vec<String> = items
                .iter()
                .map(|i| i.as_ref().unwrap().delta.clone())
                .collect();
            assert_eq!(deltas, vec!["Hel", "lo", ""]);
            assert!(items.last().unwrap().as_ref().unwrap().is_final());
            assert_eq!(fallback.call_count(), 0);
        }

        #[tokio::test]
        async fn open_failure_restarts_on_fallback_invisibly() {
            let primary = MockAiProvider::new().with_error(unavailable());
            let fallback = MockAiProvider::new().with_stream_script(
                vec!["fallback ", "output"],
                ScriptOutcome::Finish(FinishReason::Stop),
            );
            let engine = engine_with(primary, fallback);

            let items = collect(engine.stream(request())).await;

            assert!(items.iter().all(|i| i.is_ok()));
            let text: String = items
                .iter()
                .map(|i| i.as_ref().unwrap().delta.clone())
                .collect();
            assert_eq!(text, "fallback output");
        }

        #[tokio::test]
        async fn pre_delta_stream_error_restarts_on_fallback() {
            // The primary stream opens but errors before its first delta.
            let primary = MockAiProvider::new()
                .with_stream_script(Vec::<String>::new(), ScriptOutcome::Fail(unavailable()));
            let fallback = MockAiProvider::new()
                .with_stream_script(vec!["ok"], ScriptOutcome::Finish(FinishReason::Stop));
            let engine = engine_with(primary, fallback);

            let items = collect(engine.stream(request())).await;

            assert!(items.iter().all(|i| i.is_ok()));
            assert_eq!(items[0].as_ref().unwrap().delta, "ok");
        }

        #[tokio::test]
        async fn mid_stream_failure_does_not_switch_providers() {
            let primary = MockAiProvider::new()
                .with_stream_script(vec!["Hel", "lo"], ScriptOutcome::Fail(unavailable()));
            let fallback = MockAiProvider::new().with_response("unused");
            let engine = engine_with(primary, fallback.clone());

            let items = collect(engine.stream(request())).await;

            assert_eq!(items.len(), 3);
            assert_eq!(items[0].as_ref().unwrap().delta, "Hel");
            assert_eq!(items[1].as_ref().unwrap().delta, "lo");
            assert!(matches!(
                items[2],
                Err(CompletionError::StreamInterrupted { .. })
            ));
            assert_eq!(fallback.call_count(), 0);
        }

        #[tokio::test]
        async fn both_streams_failing_yields_single_combined_error() {
            let primary = MockAiProvider::new()
                .with_provider_info(ProviderInfo::new("openai", "gpt-4o"))
                .with_error(unavailable());
            let fallback = MockAiProvider::new()
                .with_provider_info(ProviderInfo::new("anthropic", "claude"))
                .with_error(MockError::Timeout { timeout_secs: 60 });
            let engine = engine_with(primary, fallback);

            let items = collect(engine.stream(request())).await;

            assert_eq!(items.len(), 1);
            let err = items[0].as_ref().unwrap_err();
            assert!(matches!(err, CompletionError::AllProvidersFailed { .. }));
            let message = err.to_string();
            assert!(message.contains("openai"));
            assert!(message.contains("anthropic"));
        }

        #[tokio::test]
        async fn no_fallback_stream_failure_surfaces_provider_error() {
            let primary = MockAiProvider::new().with_error(unavailable());
            let engine = CompletionEngine::new(Arc::new(primary));

            let items = collect(engine.stream(request())).await;

            assert_eq!(items.len(), 1);
            assert!(matches!(
                items[0],
                Err(CompletionError::ProviderFailed { .. })
            ));
        }
    }
}
