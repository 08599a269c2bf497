//! Error type shared by the git gateway, the diff parser, and the MCP layer.

use rmcp::model::ErrorCode;
use rmcp::ErrorData as McpError;
use thiserror::Error;

/// Everything that can go wrong while answering a tool call.
#[derive(Error, Debug)]
pub enum MergeLensError {
    #[error("Repository path does not exist or is not a directory: {path}")]
    RepositoryNotFound { path: String },

    /// The git subprocess failed, could not be spawned, or timed out.
    #[error("{0}")]
    Vcs(String),

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MergeLensError>;

impl MergeLensError {
    /// Convert into a protocol error. Unknown tools map to `MethodNotFound`,
    /// everything else collapses into `InternalError` carrying the message.
    pub fn into_mcp_error(self) -> McpError {
        match self {
            Self::UnknownTool(_) => {
                McpError::new(ErrorCode::METHOD_NOT_FOUND, self.to_string(), None)
            }
            other => McpError::internal_error(other.to_string(), None),
        }
    }
}
