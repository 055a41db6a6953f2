//! Tool inventory and indexing.
//!
//! This module provides the catalog's tool storage:
//! - Qualified tool names unique across sources
//! - Insertion-ordered, snapshot-friendly index
//! - The handler seam through which tools are executed

pub mod index;
pub mod types;

pub use index::ToolIndex;
pub use types::{CatalogTool, QualifiedToolName, ToolCategory, ToolHandler};
