//! Askdata server binary.
//!
//! Wires the adapters to the ask flow and serves the HTTP API.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use askdata::adapters::ai::{
    OpenAiCompletionConfig, OpenAiCompletionModel, OpenAiEmbeddingConfig, OpenAiEmbeddingModel,
};
use askdata::adapters::http::{ask_routes, AskHandlers};
use askdata::adapters::pinecone::{PineconeConfig, PineconeIndex};
use askdata::adapters::redshift::RedshiftWarehouse;
use askdata::application::handlers::{AgentRunner, AnswerRefiner, AskQuestionHandler};
use askdata::application::tools::warehouse_tools;
use askdata::config::AppConfig;
use askdata::ports::{CompletionModel, EmbeddingModel, SemanticIndex, Warehouse};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config);
    tracing::info!(environment = ?config.server.environment, "starting askdata");

    let pool = PgPoolOptions::new()
        .min_connections(config.warehouse.min_connections)
        .max_connections(config.warehouse.max_connections)
        .acquire_timeout(config.warehouse.acquire_timeout())
        .idle_timeout(config.warehouse.idle_timeout())
        .connect(&config.warehouse.url)
        .await?;
    tracing::info!("warehouse pool ready");

    // validate() has already required both API keys
    let openai_key = config.ai.openai_api_key.clone().unwrap_or_default();
    let pinecone_key = config.index.pinecone_api_key.clone().unwrap_or_default();

    let completion_model: Arc<dyn CompletionModel> = Arc::new(OpenAiCompletionModel::new(
        OpenAiCompletionConfig::new(openai_key.clone())
            .with_model(config.ai.chat_model.clone())
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    ));

    let embedder: Arc<dyn EmbeddingModel> = Arc::new(OpenAiEmbeddingModel::new(
        OpenAiEmbeddingConfig::new(openai_key)
            .with_model(config.ai.embedding_model.clone())
            .with_timeout(config.ai.timeout())
            .with_max_retries(config.ai.max_retries),
    ));

    let mut index_config = PineconeConfig::new(pinecone_key, config.index.index_host.clone());
    if let Some(namespace) = &config.index.namespace {
        index_config = index_config.with_namespace(namespace.clone());
    }
    let index: Arc<dyn SemanticIndex> = Arc::new(PineconeIndex::new(index_config, embedder));

    let warehouse: Arc<dyn Warehouse> = Arc::new(RedshiftWarehouse::new(pool));

    let runner = AgentRunner::new(
        completion_model.clone(),
        warehouse_tools(warehouse),
        config.agent.max_steps,
        config.ai.temperature,
    );
    let refiner = AnswerRefiner::new(completion_model, config.ai.temperature);
    let ask_handler = Arc::new(AskQuestionHandler::new(
        index,
        runner,
        refiner,
        config.index.top_k,
    ));

    let app = ask_routes(AskHandlers::new(ask_handler))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors_layer(&config));

    let addr = config.server.socket_addr()?;
    tracing::info!(%addr, "listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}
