//! Error types for the tool integration layer.
//!
//! Two failure families exist and are separate types:
//! - [`DiscoveryError`]: listing tools failed. Always collapsed to an empty tool
//!   list at the client boundary and never propagated to callers.
//! - [`McpError`]: invoking a tool (or configuring the layer) failed. These are
//!   caller-visible and may propagate to the runtime's tool-execution wrapper.

use thiserror::Error;

pub type McpResult<T> = Result<T, McpError>;

#[derive(Debug, Error)]
pub enum McpError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Source not found: {0}")]
    SourceNotFound(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Tool invocation failed{}: {message}", .status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Invocation {
        status: Option<u16>,
        message: String,
    },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[from] SchemaViolation),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

impl McpError {
    pub fn invocation(status: Option<u16>, message: impl Into<String>) -> Self {
        McpError::Invocation {
            status,
            message: message.into(),
        }
    }

    /// Message that is safe to show to an end user or hand back to the model.
    ///
    /// Never includes transport internals, upstream bodies, or error type names.
    pub fn user_message(&self) -> String {
        match self {
            McpError::ToolNotFound(name) => format!("The tool '{name}' is not available"),
            McpError::SourceNotFound(_) | McpError::Config(_) => {
                "The tool service is not configured".to_string()
            }
            McpError::Transport(_) | McpError::Io(_) => {
                "The tool service is currently unreachable".to_string()
            }
            McpError::Invocation {
                status: Some(status),
                ..
            } => format!("The tool service returned an error (status {status})"),
            McpError::Invocation { status: None, .. } => {
                "The tool service returned an unusable response".to_string()
            }
            McpError::InvalidArguments(violation) => {
                format!("The tool arguments were invalid: {violation}")
            }
            McpError::Auth(_) => "The tool service rejected the credentials".to_string(),
            McpError::Yaml(_) => "The tool service configuration is invalid".to_string(),
        }
    }
}

impl From<reqwest::Error> for McpError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => McpError::invocation(Some(status.as_u16()), err.to_string()),
            None => McpError::Transport(err.to_string()),
        }
    }
}

/// Reasons a discovery request produced nothing usable.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("registry returned status {0}")]
    Status(u16),

    #[error("malformed response body: {0}")]
    Malformed(String),

    #[error("no endpoint for source '{0}'")]
    UnknownSource(String),

    #[error("credentials unavailable: {0}")]
    Credentials(String),
}

/// A payload that does not satisfy a [`crate::schema::ValidatedSchema`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("missing required field '{0}'")]
    MissingField(String),

    #[error("expected {expected} at '{path}'")]
    TypeMismatch { path: String, expected: &'static str },
}
