//! Payload builders that hand catalog tools to a model runtime.
//!
//! - catalog snapshot -> function tool JSON (for upstream model calls)
//! - catalog snapshot -> [`RuntimeTool`] entries (schemas plus an invoke handle)

use serde_json::{json, Value};

use crate::{
    error::McpResult,
    inventory::{CatalogTool, ToolIndex},
};

/// Build function-tool JSON payloads from a catalog snapshot, in catalog order.
pub fn build_function_tools_json(index: &ToolIndex) -> Vec<Value> {
    index
        .iter()
        .map(|tool| {
            json!({
                "type": "function",
                "name": tool.name(),
                "description": tool.description,
                "parameters": tool.input_schema.to_parameters_schema(),
            })
        })
        .collect()
}

/// A tool as seen by the runtime: name, description, both schemas, and `invoke`.
#[derive(Debug, Clone)]
pub struct RuntimeTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub output_schema: Value,
    tool: CatalogTool,
}

impl RuntimeTool {
    pub fn new(tool: CatalogTool) -> Self {
        Self {
            name: tool.name().to_string(),
            description: tool.description.clone(),
            input_schema: tool.input_schema.to_parameters_schema(),
            output_schema: tool.output_schema().to_json_schema(),
            tool,
        }
    }

    /// Validate and execute. Fallback tools report failures inside their output.
    pub async fn invoke(&self, arguments: Value) -> McpResult<Value> {
        self.tool.invoke(arguments).await
    }
}

/// One runtime entry per catalog tool, in catalog order.
pub fn build_runtime_tools(index: &ToolIndex) -> Vec<RuntimeTool> {
    index.iter().cloned().map(RuntimeTool::new).collect()
}
