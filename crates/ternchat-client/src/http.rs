use std::time::Duration;

use async_trait::async_trait;
use futures_util::{StreamExt, TryStreamExt};
use ternchat_models::{ChatRequest, ChatResponse};

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::logging::{log_request, log_response, log_stream_chunk};
use crate::transport::{ByteStream, ChatTransport};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(600);

/// reqwest-backed transport for OpenAI-compatible chat completion servers
pub struct HttpTransport {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    async fn send(&self, request: &ChatRequest) -> Result<reqwest::Response, TransportError> {
        let url = self.completions_url();
        log_request(&url, request, &self.config.api_key, self.config.verbose);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unable to read error body".to_string());
            log_response(status, &body, self.config.verbose);
            return Err(TransportError::Status { status, body });
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn post(&self, request: &ChatRequest) -> Result<ChatResponse, TransportError> {
        let response = self.send(request).await?;
        Ok(response.json::<ChatResponse>().await?)
    }

    async fn post_streaming(&self, request: &ChatRequest) -> Result<ByteStream, TransportError> {
        let response = self.send(request).await?;
        let verbose = self.config.verbose;
        let stream = response
            .bytes_stream()
            .map_err(TransportError::Request)
            .enumerate()
            .map(move |(n, chunk)| {
                if let Ok(bytes) = &chunk {
                    log_stream_chunk(n, &String::from_utf8_lossy(bytes), verbose);
                }
                chunk
            });
        Ok(Box::pin(stream))
    }
}
