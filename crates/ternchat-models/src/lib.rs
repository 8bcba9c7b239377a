// Models module - data structures for API communication
pub mod requests;
pub mod responses;
pub mod types;

// Re-export commonly used types
pub use types::{FunctionCall, Message, Role, ToolCall};
pub use requests::{ChatRequest, FunctionSpec, RequestOptions, ToolSpec};
pub use responses::{
    ChatResponse, Choice, Usage,
    StreamChoice, StreamChunk, StreamDelta, StreamFunctionDelta, StreamToolCallDelta,
};
