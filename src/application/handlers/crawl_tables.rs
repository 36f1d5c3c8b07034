//! CrawlTablesHandler - builds the semantic index from the catalog.
//!
//! For each requested table: read its metadata from the warehouse,
//! render it as prose, ask the model for an assumption summary, and
//! store the combined document in the index. Tables crawl concurrently;
//! any failure aborts the whole crawl before the index is touched.

use std::sync::Arc;

use futures::future::try_join_all;

use crate::domain::catalog::{
    describe_table, render_assumption_prompt, ContextDocument, TableRef,
};
use crate::ports::{
    CompletionError, CompletionModel, CompletionRequest, IndexError, SemanticIndex, Warehouse,
    WarehouseError,
};

/// Error type for the crawl flow.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// Reading table metadata from the warehouse failed.
    #[error("catalog read failed: {0}")]
    Warehouse(#[from] WarehouseError),

    /// The assumption summary could not be generated.
    #[error("assumption generation failed: {0}")]
    Model(#[from] CompletionError),

    /// Storing the documents in the index failed.
    #[error("index write failed: {0}")]
    Index(#[from] IndexError),
}

/// Outcome of a completed crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Number of documents written to the index.
    pub documents: usize,
}

/// Crawls warehouse tables into context documents.
pub struct CrawlTablesHandler {
    warehouse: Arc<dyn Warehouse>,
    model: Arc<dyn CompletionModel>,
    index: Arc<dyn SemanticIndex>,
    temperature: f32,
}

impl CrawlTablesHandler {
    pub fn new(
        warehouse: Arc<dyn Warehouse>,
        model: Arc<dyn CompletionModel>,
        index: Arc<dyn SemanticIndex>,
        temperature: f32,
    ) -> Self {
        Self {
            warehouse,
            model,
            index,
            temperature,
        }
    }

    /// Crawls the given tables and stores their documents.
    pub async fn handle(&self, tables: &[TableRef]) -> Result<CrawlSummary, CrawlError> {
        let documents =
            try_join_all(tables.iter().map(|table| self.crawl_table(table))).await?;

        self.index.add_documents(&documents).await?;
        tracing::info!(documents = documents.len(), "catalog crawl stored");

        Ok(CrawlSummary {
            documents: documents.len(),
        })
    }

    async fn crawl_table(&self, table: &TableRef) -> Result<ContextDocument, CrawlError> {
        tracing::info!(table = %table, "crawling table");

        let metadata = self.warehouse.table_metadata(table).await?;
        let description = describe_table(&metadata);
        let assumption = self.write_assumption(&description).await?;

        Ok(ContextDocument::from_parts(&metadata, description, &assumption))
    }

    async fn write_assumption(&self, description: &str) -> Result<String, CrawlError> {
        let request = CompletionRequest::new(render_assumption_prompt(description))
            .with_temperature(self.temperature);
        let completion = self.model.complete(request).await?;
        Ok(completion.text.trim().to_string())
    }
}
