use ternchat_models::StreamChunk;

use crate::error::StreamError;

/// How many malformed `data:` lines in a row we skip before treating the
/// stream as broken.
pub const MALFORMED_LINE_TOLERANCE: u32 = 8;

/// One decoded SSE line
#[derive(Debug)]
pub enum SseEvent {
    /// A parsed JSON chunk
    Chunk(StreamChunk),
    /// The `data: [DONE]` terminator; no further events follow
    Done,
    /// Keep-alive blanks, comments, anything without the `data: ` prefix
    Ignored,
    /// A `data:` line whose payload failed to parse; non-fatal, skip it
    Malformed { error: String },
}

/// Classifies SSE lines into chunk events.
///
/// Malformed payloads are reported but do not abort the stream, so one
/// garbled chunk never kills a turn. A run of consecutive malformed lines
/// past the tolerance does abort, so a genuinely broken stream is not
/// silently swallowed.
#[derive(Debug)]
pub struct EventDecoder {
    consecutive_malformed: u32,
    tolerance: u32,
}

impl Default for EventDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDecoder {
    pub fn new() -> Self {
        Self::with_tolerance(MALFORMED_LINE_TOLERANCE)
    }

    pub fn with_tolerance(tolerance: u32) -> Self {
        Self {
            consecutive_malformed: 0,
            tolerance,
        }
    }

    pub fn decode(&mut self, line: &str) -> Result<SseEvent, StreamError> {
        let Some(data) = line.strip_prefix("data: ") else {
            return Ok(SseEvent::Ignored);
        };

        if data.trim() == "[DONE]" {
            self.consecutive_malformed = 0;
            return Ok(SseEvent::Done);
        }

        match serde_json::from_str::<StreamChunk>(data) {
            Ok(chunk) => {
                self.consecutive_malformed = 0;
                Ok(SseEvent::Chunk(chunk))
            }
            Err(e) => {
                self.consecutive_malformed += 1;
                if self.consecutive_malformed > self.tolerance {
                    return Err(StreamError::MalformedFlood {
                        count: self.consecutive_malformed,
                    });
                }
                Ok(SseEvent::Malformed {
                    error: e.to_string(),
                })
            }
        }
    }
}
