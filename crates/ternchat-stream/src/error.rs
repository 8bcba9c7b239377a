use thiserror::Error;

/// Errors raised while decoding a streamed completion
#[derive(Debug, Error)]
pub enum StreamError {
    /// Too many malformed `data:` lines in a row. Individual malformed lines
    /// are skipped as diagnostics, but an unbroken run of them means the
    /// stream itself is broken rather than a single chunk being garbled.
    #[error("gave up after {count} consecutive malformed stream lines")]
    MalformedFlood { count: u32 },
}
