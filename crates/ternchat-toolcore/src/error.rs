use thiserror::Error;

/// Errors surfaced by tool lookup and execution
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("tool not found: {name}")]
    NotFound { name: String },

    #[error("tool '{name}' failed (call {call_id}): {cause}")]
    ExecutionFailed {
        name: String,
        call_id: String,
        cause: anyhow::Error,
    },
}
