use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use crate::error::{VotaError, VotaResult};

pub mod proposals;
pub mod search;
pub mod supermultiply;

pub use proposals::GetProposalsTool;
pub use search::TavilySearchTool;
pub use supermultiply::{supermultiply, SupermultiplyTool};

/// Tool description in the shape the Messages API expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: Value,
}

impl ToolOutput {
    pub fn new(content: Value) -> Self {
        Self { content }
    }

    /// Text handed back to the model: strings verbatim, anything else as JSON.
    pub fn to_text(&self) -> String {
        match &self.content {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

#[async_trait]
pub trait Tool: Send + Sync {
    async fn execute(&self, input: Value) -> VotaResult<ToolOutput>;
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn input_schema(&self) -> Value;

    /// When true, a successful call ends the agent turn with this output.
    fn return_direct(&self) -> bool {
        false
    }

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema(),
        }
    }
}

#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.push(tool);
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.register(tool);
        self
    }

    pub fn get(&self, tool_name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == tool_name)
    }

    pub async fn execute_tool(&self, tool_name: &str, input: Value) -> VotaResult<ToolOutput> {
        let tool = self
            .get(tool_name)
            .ok_or_else(|| VotaError::invalid_input(format!("Tool '{}' not found", tool_name)))?;

        debug!("Executing tool {} with {}", tool_name, input);
        tool.execute(input).await
    }

    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.iter().map(|tool| tool.spec()).collect()
    }

    pub fn list_tools(&self) -> Vec<(&str, &str)> {
        self.tools.iter().map(|tool| (tool.name(), tool.description())).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
