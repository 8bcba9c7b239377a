use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use ternchat_models::{ChatRequest, ChatResponse};

use crate::error::TransportError;

/// Raw byte chunks from a streaming response, in arrival order
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Generic HTTP transport for the chat completions endpoint.
///
/// TLS, redirects and connection pooling live behind this seam; the turn
/// logic only ever sees request bodies going out and bytes coming back.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Non-streaming completion: one request, one parsed response.
    async fn post(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError>;

    /// Streaming completion: the response body is handed back as a byte-chunk
    /// stream with arbitrary read boundaries.
    async fn post_streaming(&self, request: &ChatRequest) -> Result<ByteStream, TransportError>;
}
