//! Warehouse tools - the two actions the agent can take.
//!
//! Both wrap the shared Warehouse port and fold every failure into an
//! observation string; nothing a tool does can abort the run. The
//! validation tool surfaces the database's own error detail so the
//! model can correct its query, while the execution tool deliberately
//! collapses failures to a fixed sentinel.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::agent::{Tool, ToolOutcome, ToolSet};
use crate::ports::Warehouse;

/// Checks a candidate query without executing it.
pub struct ValidateQueryTool {
    warehouse: Arc<dyn Warehouse>,
}

impl ValidateQueryTool {
    pub fn new(warehouse: Arc<dyn Warehouse>) -> Self {
        Self { warehouse }
    }
}

#[async_trait]
impl Tool for ValidateQueryTool {
    fn name(&self) -> &str {
        "validate_redshift_query"
    }

    fn description(&self) -> &str {
        "Validate a Redshift SQL query to ensure it can be executed without errors."
    }

    async fn call(&self, input: &str) -> ToolOutcome {
        match self.warehouse.validate_query(input).await {
            Ok(()) => ToolOutcome::Success("Query is valid".to_string()),
            Err(err) => {
                ToolOutcome::Failure(format!("Error occurred while validating query: {}", err))
            }
        }
    }
}

/// Executes a validated query and renders the result set.
pub struct RunQueryTool {
    warehouse: Arc<dyn Warehouse>,
}

impl RunQueryTool {
    pub fn new(warehouse: Arc<dyn Warehouse>) -> Self {
        Self { warehouse }
    }
}

#[async_trait]
impl Tool for RunQueryTool {
    fn name(&self) -> &str {
        "run_redshift_query"
    }

    fn description(&self) -> &str {
        "Run a Redshift SQL query that has already been validated and return the result."
    }

    async fn call(&self, input: &str) -> ToolOutcome {
        match self.warehouse.run_query(input).await {
            Ok(rendered) => ToolOutcome::Success(rendered),
            Err(err) => {
                // The observation hides the detail; keep it in the log
                tracing::debug!(error = %err, "query execution failed");
                ToolOutcome::Failure("Redshift SQL query is not valid".to_string())
            }
        }
    }
}

/// Builds the standard tool set over one warehouse handle.
pub fn warehouse_tools(warehouse: Arc<dyn Warehouse>) -> ToolSet {
    ToolSet::new(vec![
        Arc::new(ValidateQueryTool::new(warehouse.clone())),
        Arc::new(RunQueryTool::new(warehouse)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::{TableMetadata, TableRef};
    use crate::ports::WarehouseError;

    /// Warehouse fake with scripted validate/run results.
    struct FakeWarehouse {
        validate_error: Option<String>,
        run_result: Result<String, String>,
    }

    impl FakeWarehouse {
        fn valid() -> Self {
            Self {
                validate_error: None,
                run_result: Ok("[(22, 'Bob')]".to_string()),
            }
        }

        fn invalid(detail: &str) -> Self {
            Self {
                validate_error: Some(detail.to_string()),
                run_result: Err(detail.to_string()),
            }
        }
    }

    #[async_trait]
    impl Warehouse for FakeWarehouse {
        async fn validate_query(&self, _query: &str) -> Result<(), WarehouseError> {
            match &self.validate_error {
                None => Ok(()),
                Some(detail) => Err(WarehouseError::QueryFailed(detail.clone())),
            }
        }

        async fn run_query(&self, _query: &str) -> Result<String, WarehouseError> {
            self.run_result
                .clone()
                .map_err(WarehouseError::QueryFailed)
        }

        async fn table_metadata(&self, _table: &TableRef) -> Result<TableMetadata, WarehouseError> {
            unimplemented!("not exercised by tool tests")
        }
    }

    #[tokio::test]
    async fn valid_query_reports_the_fixed_success_string() {
        let tool = ValidateQueryTool::new(Arc::new(FakeWarehouse::valid()));

        let outcome = tool.call("SELECT 1").await;

        assert!(!outcome.is_failure());
        assert_eq!(outcome.render(), "Query is valid");
    }

    #[tokio::test]
    async fn invalid_query_surfaces_the_database_detail() {
        let tool = ValidateQueryTool::new(Arc::new(FakeWarehouse::invalid(
            "relation \"lrt_demo.nope\" does not exist",
        )));

        let outcome = tool.call("SELECT * FROM lrt_demo.nope").await;

        assert!(outcome.is_failure());
        assert_eq!(
            outcome.render(),
            "Error occurred while validating query: relation \"lrt_demo.nope\" does not exist"
        );
    }

    #[tokio::test]
    async fn execution_returns_the_rendered_rows() {
        let tool = RunQueryTool::new(Arc::new(FakeWarehouse::valid()));

        let outcome = tool.call("SELECT sale_id, buyer FROM lrt_demo.dm_sales").await;

        assert_eq!(outcome.render(), "[(22, 'Bob')]");
    }

    #[tokio::test]
    async fn execution_failure_collapses_to_the_sentinel() {
        let tool = RunQueryTool::new(Arc::new(FakeWarehouse::invalid("syntax error at FORM")));

        let outcome = tool.call("SELECT * FORM lrt_demo.dm_sales").await;

        assert!(outcome.is_failure());
        assert_eq!(outcome.render(), "Redshift SQL query is not valid");
    }

    #[test]
    fn tool_set_registers_both_tools_by_name() {
        let tools = warehouse_tools(Arc::new(FakeWarehouse::valid()));

        assert_eq!(tools.len(), 2);
        assert!(tools.get("validate_redshift_query").is_some());
        assert!(tools.get("run_redshift_query").is_some());
        assert_eq!(
            tools.names(),
            "validate_redshift_query, run_redshift_query"
        );
    }
}
