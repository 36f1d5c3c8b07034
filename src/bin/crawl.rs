//! Catalog crawler binary.
//!
//! Crawls the named warehouse tables into the semantic index:
//!
//! ```text
//! askdata-crawl lrt_demo.dm_route lrt_demo.dm_sales
//! ```

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use askdata::adapters::ai::{
    OpenAiCompletionConfig, OpenAiCompletionModel, OpenAiEmbeddingConfig, OpenAiEmbeddingModel,
};
use askdata::adapters::pinecone::{PineconeConfig, PineconeIndex};
use askdata::adapters::redshift::RedshiftWarehouse;
use askdata::application::handlers::CrawlTablesHandler;
use askdata::config::AppConfig;
use askdata::domain::catalog::TableRef;
use askdata::ports::{CompletionModel, EmbeddingModel, SemanticIndex, Warehouse};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let tables = std::env::args()
        .skip(1)
        .map(|arg| arg.parse::<TableRef>())
        .collect::<Result<Vec<_>, _>>()?;

    if tables.is_empty() {
        eprintln!("usage: askdata-crawl <schema.table> [<schema.table> ...]");
        std::process::exit(2);
    }

    let pool = PgPoolOptions::new()
        .min_connections(config.warehouse.min_connections)
        .max_connections(config.warehouse.max_connections)
        .acquire_timeout(config.warehouse.acquire_timeout())
        .idle_timeout(config.warehouse.idle_timeout())
        .connect(&config.warehouse.url)
        .await?;

    let openai_key = config.ai.openai_api_key.clone().unwrap_or_default();
    let pinecone_key = config.index.pinecone_api_key.clone().unwrap_or_default();

    let model: Arc<dyn CompletionModel> = Arc::new(OpenAiCompletionModel::new(
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

    let handler = CrawlTablesHandler::new(warehouse, model, index, config.ai.temperature);
    let summary = handler.handle(&tables).await?;

    tracing::info!(documents = summary.documents, "crawl complete");
    Ok(())
}
