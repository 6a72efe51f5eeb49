//! Portfolio MCP server implementation

use anyhow::Result;
use rmcp::{
    handler::server::{tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;

use portfolio_matcher::config::COLLECTION_NAME;
use portfolio_matcher::{Collection, LoadOutcome, Portfolio, PortfolioLink, PortfolioPaths};

/// Parameters for portfolio_query tool
#[derive(Debug, Deserialize, JsonSchema)]
pub struct QueryParams {
    /// Skills required by a job (e.g., ["Python", "Machine Learning"])
    #[schemars(description = "Skills to match against the portfolio")]
    pub skills: Vec<String>,
    /// Merge matches of every skill instead of only the first one
    #[schemars(description = "Merge matches across all skills (default: first skill only)")]
    #[serde(default)]
    pub merge: bool,
}

/// Portfolio MCP Service
#[derive(Clone)]
pub struct PortfolioService {
    paths: PortfolioPaths,
    tool_router: ToolRouter<Self>,
}

impl PortfolioService {
    pub fn new(paths: PortfolioPaths) -> Self {
        Self {
            paths,
            tool_router: Self::tool_router(),
        }
    }
}

/// Run SQLite-bound work off the async executor
async fn blocking<T, F>(work: F) -> Result<T, McpError>
where
    F: FnOnce() -> portfolio_matcher::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| McpError::internal_error(format!("Portfolio task failed: {}", e), None))?
        .map_err(|e| McpError::internal_error(format!("Portfolio error: {}", e), None))
}

fn query_portfolio(
    paths: &PortfolioPaths,
    skills: Vec<String>,
    merge: bool,
) -> portfolio_matcher::Result<Vec<PortfolioLink>> {
    let portfolio = Portfolio::open(paths)?;
    portfolio.load_portfolio()?;

    Ok(if merge {
        portfolio.query_links_merged(skills)
    } else {
        portfolio.query_links(skills)
    })
}

fn load_portfolio(paths: &PortfolioPaths) -> portfolio_matcher::Result<Value> {
    let outcome = Portfolio::open(paths)?.load_portfolio()?;

    Ok(match outcome {
        LoadOutcome::Populated { inserted } => {
            serde_json::json!({ "populated": true, "inserted": inserted })
        }
        LoadOutcome::AlreadyLoaded { existing } => {
            serde_json::json!({ "populated": false, "existing": existing })
        }
    })
}

fn portfolio_status(paths: &PortfolioPaths) -> portfolio_matcher::Result<Value> {
    // Opening would create the store, so check first
    let count = if paths.index_file().exists() {
        Collection::open(&paths.store, COLLECTION_NAME)?.count()?
    } else {
        0
    };

    Ok(serde_json::json!({
        "loaded": count > 0,
        "entries": count,
    }))
}

#[tool_router]
impl PortfolioService {
    /// Find portfolio links for a set of skills
    #[tool(description = "Find portfolio project links matching job skills. Loads the portfolio index on first use. Returns a JSON list of {\"links\": url} objects.")]
    async fn portfolio_query(
        &self,
        params: Parameters<QueryParams>,
    ) -> Result<CallToolResult, McpError> {
        let paths = self.paths.clone();
        let QueryParams { skills, merge } = params.0;
        let links = blocking(move || query_portfolio(&paths, skills, merge)).await?;

        let output = serde_json::to_string_pretty(&links).map_err(|e| {
            McpError::internal_error(format!("JSON serialization failed: {}", e), None)
        })?;

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    /// Populate the index from the dataset
    #[tool(description = "Load the portfolio dataset into the similarity index. Does nothing if the index already holds entries.")]
    async fn portfolio_load(&self) -> Result<CallToolResult, McpError> {
        let paths = self.paths.clone();
        let output = blocking(move || load_portfolio(&paths)).await?;

        Ok(CallToolResult::success(vec![Content::text(output.to_string())]))
    }

    /// Report whether the portfolio is loaded
    #[tool(description = "Get portfolio index status: whether it is loaded and the total number of entries.")]
    async fn portfolio_status(&self) -> Result<CallToolResult, McpError> {
        let paths = self.paths.clone();
        let output = blocking(move || portfolio_status(&paths)).await?;

        Ok(CallToolResult::success(vec![Content::text(
            serde_json::to_string_pretty(&output).unwrap_or_default(),
        )]))
    }
}

#[tool_handler]
impl ServerHandler for PortfolioService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Portfolio matcher MCP server. Maps job skills to links of past portfolio projects.".to_string(),
            ),
            ..Default::default()
        }
    }
}

/// Run the MCP server
pub async fn run_mcp_server(paths: PortfolioPaths) -> Result<()> {
    use tokio::io::{stdin, stdout};

    let service = PortfolioService::new(paths);
    let transport = (stdin(), stdout());
    let server = service.serve(transport).await?;
    server.waiting().await?;

    Ok(())
}
