use thiserror::Error;

use ternchat_client::TransportError;
use ternchat_stream::StreamError;

/// Turn-level failures, each naming the phase that failed
#[derive(Debug, Error)]
pub enum TurnError {
    /// The request was never sent: model or history missing.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Connection, timeout or cancellation while talking to the server.
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The stream itself broke beyond per-chunk recovery.
    #[error("streaming failed: {0}")]
    Stream(#[from] StreamError),

    /// The model kept requesting tools past the configured cap.
    #[error("exceeded maximum of {limit} tool-call iterations")]
    MaxIterationsExceeded { limit: usize },
}
