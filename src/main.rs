//! Parlor server entry point.
//!
//! Loads configuration, wires providers and stores into the application
//! handlers, and serves the chat API over Axum.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use parlor::adapters::ai::{
    AnthropicConfig, AnthropicProvider, CompletionEngine, OpenAiConfig, OpenAiProvider,
};
use parlor::adapters::document::InMemoryDocumentSource;
use parlor::adapters::http::chat::{chat_router, ChatAppState};
use parlor::adapters::image::{MockImageGenerator, SynthesisClient, SynthesisConfig};
use parlor::adapters::storage::InMemoryConversationStore;
use parlor::application::chat::{
    ConversationQueries, GenerateImageHandler, SendMessageHandler, StreamChatHandler, TurnParams,
};
use parlor::config::{AiConfig, AiProviderKind, AppConfig};
use parlor::ports::{AiProvider, ConversationStore, DocumentSource, ImageGenerator};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(&config.server.log_level)
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate()?;

    let state = build_state(&config);
    let app = chat_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config));

    let addr = config.server.socket_addr();
    tracing::info!(%addr, environment = ?config.server.environment, "starting parlor");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wires adapters into the shared handler state.
fn build_state(config: &AppConfig) -> ChatAppState {
    let primary = build_provider(
        config.ai.primary_provider,
        config.ai.primary_model.clone(),
        &config.ai,
    );

    let mut engine = CompletionEngine::new(primary);
    if let Some(fallback_kind) = config.ai.fallback_provider {
        let fallback = build_provider(
            fallback_kind,
            config.ai.fallback_model.clone(),
            &config.ai,
        );
        engine = engine.with_fallback(fallback);
    } else {
        tracing::warn!("no fallback provider configured; provider failures will surface directly");
    }
    let engine = Arc::new(engine);

    let store: Arc<dyn ConversationStore> = Arc::new(InMemoryConversationStore::new());
    let documents: Arc<dyn DocumentSource> = Arc::new(InMemoryDocumentSource::new());

    let generator: Arc<dyn ImageGenerator> = if config.image.has_key() {
        let key = config.image.api_key.clone().unwrap_or_default();
        let mut synthesis = SynthesisConfig::new(key).with_timeout(config.image.timeout());
        if let Some(url) = &config.image.base_url {
            synthesis = synthesis.with_base_url(url.clone());
        }
        Arc::new(SynthesisClient::new(synthesis))
    } else {
        tracing::warn!("no image service key configured; using the mock generator");
        Arc::new(MockImageGenerator::new())
    };

    let params = TurnParams {
        temperature: config.ai.temperature,
        max_tokens: config.ai.max_tokens,
    };

    let image_handler = Arc::new(GenerateImageHandler::new(Arc::clone(&store), generator));
    let send_handler = Arc::new(
        SendMessageHandler::new(
            Arc::clone(&engine),
            Arc::clone(&store),
            Arc::clone(&documents),
            Arc::clone(&image_handler),
        )
        .with_params(params),
    );
    let stream_handler = Arc::new(
        StreamChatHandler::new(
            engine,
            Arc::clone(&store),
            documents,
            Arc::clone(&image_handler),
        )
        .with_params(params),
    );
    let queries = Arc::new(ConversationQueries::new(store));

    ChatAppState::new(send_handler, stream_handler, image_handler, queries)
}

/// Builds one provider adapter from configuration.
fn build_provider(
    kind: AiProviderKind,
    model: Option<String>,
    ai: &AiConfig,
) -> Arc<dyn AiProvider> {
    match kind {
        AiProviderKind::OpenAI => {
            let key = ai.openai_api_key.clone().unwrap_or_default();
            let mut provider_config = OpenAiConfig::new(key).with_timeout(ai.timeout());
            if let Some(model) = model {
                provider_config = provider_config.with_model(model);
            }
            Arc::new(OpenAiProvider::new(provider_config))
        }
        AiProviderKind::Anthropic => {
            let key = ai.anthropic_api_key.clone().unwrap_or_default();
            let mut provider_config = AnthropicConfig::new(key).with_timeout(ai.timeout());
            if let Some(model) = model {
                provider_config = provider_config.with_model(model);
            }
            Arc::new(AnthropicProvider::new(provider_config))
        }
    }
}

/// Builds the CORS layer from configured origins.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(parsed)
            .allow_methods([Method::GET, Method::POST, Method::DELETE])
            .allow_headers(Any)
    }
}
