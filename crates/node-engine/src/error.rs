//! Error types for the node engine

use thiserror::Error;

/// Result type alias using NodeEngineError
pub type Result<T> = std::result::Result<T, NodeEngineError>;

/// Errors that can occur in the node engine
#[derive(Debug, Error)]
pub enum NodeEngineError {
    /// Missing required input
    #[error("Missing required input: {0}")]
    MissingInput(String),

    /// Invalid input type
    #[error("Invalid input type for '{port}': expected {expected}")]
    InvalidInputType { port: String, expected: String },

    /// Task execution failed
    #[error("Task execution failed: {0}")]
    ExecutionFailed(String),

    /// Error surfaced by a remote backend (auth, rate limit, network, stream)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Plugin configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NodeEngineError {
    /// Create an invalid input type error
    pub fn invalid_type(port: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidInputType {
            port: port.into(),
            expected: expected.into(),
        }
    }

    /// Convert into a graph-flow error for `Task::run`
    pub fn into_graph_flow(self) -> graph_flow::GraphError {
        graph_flow::GraphError::TaskExecutionFailed(self.to_string())
    }
}
