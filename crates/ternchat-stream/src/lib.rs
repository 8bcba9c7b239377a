// Stream module - SSE framing and tool-call reassembly for streamed completions
pub mod assembler;
pub mod decoder;
pub mod error;
pub mod line_buffer;

pub use assembler::ToolCallAssembler;
pub use decoder::{EventDecoder, SseEvent, MALFORMED_LINE_TOLERANCE};
pub use error::StreamError;
pub use line_buffer::LineBuffer;
