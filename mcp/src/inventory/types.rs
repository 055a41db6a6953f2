//! Core types for the tool inventory.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{error::McpResult, schema::ValidatedSchema};

static PERMISSIVE: ValidatedSchema = ValidatedSchema::Permissive;

/// Where a catalog tool came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    #[default]
    Remote,
    Fallback,
}

/// Catalog-unique tool identifier: `<source>_<tool>` restricted to `[A-Za-z0-9_]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualifiedToolName(String);

impl QualifiedToolName {
    pub fn new(source: &str, tool_name: &str) -> Self {
        Self(sanitize(&format!("{source}_{tool_name}")))
    }

    /// Name for a tool that belongs to no source (fallback tools).
    pub fn unscoped(tool_name: &str) -> Self {
        Self(sanitize(tool_name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

impl fmt::Display for QualifiedToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for QualifiedToolName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Executes a tool call.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, arguments: Value) -> McpResult<Value>;
}

/// A tool held by the catalog, ready to hand to the model runtime.
#[derive(Clone)]
pub struct CatalogTool {
    pub qualified_name: QualifiedToolName,
    pub description: String,
    pub input_schema: ValidatedSchema,
    output_schema: Option<ValidatedSchema>,
    pub category: ToolCategory,
    /// Source the tool was discovered from; `None` for fallback tools.
    pub source: Option<String>,
    handler: Arc<dyn ToolHandler>,
}

impl CatalogTool {
    pub fn new(
        qualified_name: QualifiedToolName,
        description: impl Into<String>,
        input_schema: ValidatedSchema,
        handler: Arc<dyn ToolHandler>,
    ) -> Self {
        Self {
            qualified_name,
            description: description.into(),
            input_schema,
            output_schema: None,
            category: ToolCategory::default(),
            source: None,
            handler,
        }
    }

    #[must_use]
    pub fn with_output_schema(mut self, schema: ValidatedSchema) -> Self {
        self.output_schema = Some(schema);
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: ToolCategory) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn name(&self) -> &str {
        self.qualified_name.as_str()
    }

    /// Output schema; permissive unless one was declared.
    pub fn output_schema(&self) -> &ValidatedSchema {
        self.output_schema.as_ref().unwrap_or(&PERMISSIVE)
    }

    pub fn has_declared_output_schema(&self) -> bool {
        self.output_schema.is_some()
    }

    /// Validate `arguments` against the input schema, then run the handler.
    ///
    /// Fallback tools validate inside their handler and report violations in
    /// their structured output instead of as an error.
    pub async fn invoke(&self, arguments: Value) -> McpResult<Value> {
        if self.category != ToolCategory::Fallback {
            self.input_schema.validate(&arguments)?;
        }
        self.handler.call(arguments).await
    }
}

impl fmt::Debug for CatalogTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogTool")
            .field("qualified_name", &self.qualified_name)
            .field("category", &self.category)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
