// Client module - HTTP transport for the chat completions endpoint
pub mod config;
pub mod error;
pub mod http;
pub mod logging;
pub mod transport;

pub use config::ClientConfig;
pub use error::TransportError;
pub use http::HttpTransport;
pub use transport::{ByteStream, ChatTransport};
