//! Error Types

use thiserror::Error;

/// Result type alias for lab operations
pub type Result<T> = std::result::Result<T, LabError>;

/// Learning-lab error types
#[derive(Error, Debug)]
pub enum LabError {
    /// LLM provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Tool not found in registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool validation failed
    #[error("Tool validation error: {0}")]
    ToolValidation(String),

    /// Tool execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Tool-call loop exceeded its iteration cap
    #[error("Tool-call loop exceeded {0} iterations")]
    ToolLoopLimit(usize),

    /// Completion was cancelled before finishing
    #[error("Completion cancelled")]
    Cancelled,

    /// Tool-protocol collaborator error
    #[error("Tool protocol error: {0}")]
    Protocol(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl LabError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LabError::ProviderUnavailable(_) | LabError::Io(_)
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            LabError::Provider(msg) => format!("The AI service encountered an error: {}", msg),
            LabError::ProviderUnavailable(_) => {
                "The AI service is currently unavailable. Please try again.".into()
            }
            LabError::ToolNotFound(name) => format!("The tool '{}' is not available.", name),
            LabError::ToolValidation(msg) => format!("Invalid tool input: {}", msg),
            LabError::ToolExecution(msg) => format!("Tool error: {}", msg),
            LabError::ToolLoopLimit(_) => {
                "The request took too many steps to process. Please try a simpler query.".into()
            }
            LabError::Cancelled => "The request was cancelled.".into(),
            LabError::Protocol(msg) => format!("Tool server error: {}", msg),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

impl From<anyhow::Error> for LabError {
    fn from(err: anyhow::Error) -> Self {
        LabError::Other(err.to_string())
    }
}
