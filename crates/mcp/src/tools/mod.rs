mod query_major_info;
mod schema;

use gaokao_core::{CatalogError, FetchError, MajorCatalog, MajorFetcher, OutputFormat};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

pub use query_major_info::QueryMajorInfoParams;
pub use schema::{clean_schema, generate_param_schema};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Every tool this server knows. Adding a tool means adding a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolId {
    QueryMajorInfo,
}

impl ToolId {
    pub const ALL: [ToolId; 1] = [ToolId::QueryMajorInfo];

    pub fn name(self) -> &'static str {
        match self {
            ToolId::QueryMajorInfo => query_major_info::NAME,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    pub fn definition(self) -> ToolDefinition {
        match self {
            ToolId::QueryMajorInfo => query_major_info::definition(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid arguments: {0}")]
    Validation(String),
    #[error(transparent)]
    Resolve(#[from] CatalogError),
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("failed to render result: {0}")]
    Render(#[from] serde_json::Error),
}

/// Outcome of one tool call. Failures are values, never protocol errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocationResult {
    pub tool_name: String,
    pub content: String,
    pub succeeded: bool,
}

impl ToolInvocationResult {
    pub fn success(tool_name: &str, output: &str) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            content: format!("{} invocation succeeded. Result:\n{}", tool_name, output),
            succeeded: true,
        }
    }

    pub fn failure(tool_name: &str, error: &ToolError) -> Self {
        Self {
            tool_name: tool_name.to_string(),
            content: format!("{} invocation failed. Error: {}", tool_name, error),
            succeeded: false,
        }
    }

    /// MCP `tools/call` result body.
    pub fn to_call_result(&self) -> Value {
        json!({
            "content": [{
                "type": "text",
                "text": self.content
            }],
            "isError": !self.succeeded
        })
    }
}

/// Immutable state shared by all invocations: the catalog, the fetcher and
/// the tool definitions, built once at startup.
pub struct ToolRegistry {
    catalog: Arc<MajorCatalog>,
    fetcher: MajorFetcher,
    format: OutputFormat,
    definitions: Vec<ToolDefinition>,
}

impl ToolRegistry {
    pub fn new(catalog: Arc<MajorCatalog>, fetcher: MajorFetcher, format: OutputFormat) -> Self {
        Self {
            catalog,
            fetcher,
            format,
            definitions: ToolId::ALL.iter().map(|tool| tool.definition()).collect(),
        }
    }

    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.definitions
    }

    /// Invoke a tool with the configured output format.
    pub async fn invoke(&self, name: &str, arguments: Value) -> ToolInvocationResult {
        self.invoke_as(name, arguments, self.format).await
    }

    pub async fn invoke_as(
        &self,
        name: &str,
        arguments: Value,
        format: OutputFormat,
    ) -> ToolInvocationResult {
        let outcome = match ToolId::from_name(name) {
            Some(tool) => self.dispatch(tool, arguments, format).await,
            None => Err(ToolError::UnknownTool(name.to_string())),
        };

        match outcome {
            Ok(output) => {
                tracing::info!(tool = name, %format, "tool invocation succeeded");
                ToolInvocationResult::success(name, &output)
            }
            Err(e) => {
                tracing::warn!(tool = name, error = %e, "tool invocation failed");
                ToolInvocationResult::failure(name, &e)
            }
        }
    }

    async fn dispatch(
        &self,
        tool: ToolId,
        arguments: Value,
        format: OutputFormat,
    ) -> Result<String, ToolError> {
        match tool {
            ToolId::QueryMajorInfo => {
                query_major_info::run(&self.catalog, &self.fetcher, arguments, format).await
            }
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(arguments: Value) -> Result<T, ToolError> {
    if !arguments.is_object() {
        return Err(ToolError::Validation(format!(
            "expected an object, got {}",
            arguments
        )));
    }
    serde_json::from_value(arguments).map_err(|e| ToolError::Validation(e.to_string()))
}
