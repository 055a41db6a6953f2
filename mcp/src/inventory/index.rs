//! Insertion-ordered tool index.
//!
//! Built off to the side by the catalog and published as an immutable
//! snapshot, so readers never observe a half-populated index.

use std::collections::HashMap;

use tracing::warn;

use super::types::{CatalogTool, ToolCategory};

#[derive(Debug, Clone, Default)]
pub struct ToolIndex {
    tools: Vec<CatalogTool>,
    by_name: HashMap<String, usize>,
}

impl ToolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tool. The first registration of a name wins; later ones are dropped.
    pub fn insert(&mut self, tool: CatalogTool) -> bool {
        if let Some(&existing) = self.by_name.get(tool.name()) {
            warn!(
                "Tool name collision: '{}' already registered from {:?}, dropping duplicate from {:?}",
                tool.qualified_name, self.tools[existing].source, tool.source
            );
            return false;
        }
        self.by_name
            .insert(tool.name().to_string(), self.tools.len());
        self.tools.push(tool);
        true
    }

    pub fn get(&self, name: &str) -> Option<&CatalogTool> {
        self.by_name.get(name).map(|&i| &self.tools[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Names in insertion order.
    pub fn names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CatalogTool> {
        self.tools.iter()
    }

    pub fn list_by_category(&self, category: ToolCategory) -> Vec<&CatalogTool> {
        self.tools
            .iter()
            .filter(|t| t.category == category)
            .collect()
    }

    pub fn count_from_source(&self, source: &str) -> usize {
        self.tools
            .iter()
            .filter(|t| t.source.as_deref() == Some(source))
            .count()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
