use thiserror::Error;

/// Transport-level failures; fatal to the current turn, never retried
/// automatically
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("server returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// The connection was cancelled mid-stream by the caller or the peer.
    #[error("connection aborted: {0}")]
    Aborted(String),
}
