/// Accumulates raw bytes from the transport and yields complete lines.
///
/// Reads may split a line, split the blank-line event boundary, or deliver
/// several events at once; the buffer never loses or duplicates bytes across
/// those boundaries. Bytes are buffered rather than strings so a UTF-8
/// sequence split across two reads reassembles correctly.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Vec<u8>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw bytes. Empty appends are no-ops.
    pub fn extend(&mut self, bytes: &[u8]) {
        if bytes.is_empty() {
            return;
        }
        self.buf.extend_from_slice(bytes);
    }

    /// Remove and return the next complete newline-terminated line, with the
    /// trailing `\r` stripped. Returns `None` without consuming anything when
    /// no full line is buffered yet.
    pub fn next_line(&mut self) -> Option<String> {
        let pos = self.buf.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
        line.pop();
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        Some(String::from_utf8_lossy(&line).into_owned())
    }

    /// Whether unterminated data remains buffered.
    pub fn has_partial(&self) -> bool {
        !self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn drain(buffer: &mut LineBuffer) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = buffer.next_line() {
            lines.push(line);
        }
        lines
    }

    #[test]
    fn yields_complete_lines_only() {
        let mut buffer = LineBuffer::new();
        buffer.extend(b"data: one\ndata: tw");
        assert_eq!(buffer.next_line().as_deref(), Some("data: one"));
        assert_eq!(buffer.next_line(), None);
        assert!(buffer.has_partial());

        buffer.extend(b"o\n");
        assert_eq!(buffer.next_line().as_deref(), Some("data: two"));
        assert!(!buffer.has_partial());
    }

    #[test]
    fn strips_carriage_returns() {
        let mut buffer = LineBuffer::new();
        buffer.extend(b"data: hello\r\n\r\n");
        assert_eq!(drain(&mut buffer), vec!["data: hello", ""]);
    }

    #[test]
    fn empty_extend_is_noop() {
        let mut buffer = LineBuffer::new();
        buffer.extend(b"");
        assert_eq!(buffer.next_line(), None);
        assert!(!buffer.has_partial());
    }

    #[test]
    fn reassembles_multibyte_utf8_split_across_reads() {
        let text = "data: héllo wörld\n";
        let bytes = text.as_bytes();
        // Split inside the two-byte 'é' sequence.
        let split = text.find('é').unwrap() + 1;
        let mut buffer = LineBuffer::new();
        buffer.extend(&bytes[..split]);
        assert_eq!(buffer.next_line(), None);
        buffer.extend(&bytes[split..]);
        assert_eq!(buffer.next_line().as_deref(), Some("data: héllo wörld"));
    }

    #[test]
    fn multiple_events_in_one_read() {
        let mut buffer = LineBuffer::new();
        buffer.extend(b"data: a\n\ndata: b\n\ndata: [DONE]\n\n");
        assert_eq!(
            drain(&mut buffer),
            vec!["data: a", "", "data: b", "", "data: [DONE]", ""]
        );
    }

    proptest::proptest! {
        /// Any fragmentation of the byte stream yields the same line sequence
        /// as feeding it in one piece.
        #[test]
        fn fragmentation_is_invisible(
            lines in proptest::collection::vec("[a-z :\\[\\]{}\"]{0,40}", 0..8),
            splits in proptest::collection::vec(0usize..64, 0..8),
        ) {
            let stream: String = lines.iter().map(|l| format!("{l}\n")).collect();
            let bytes = stream.as_bytes();

            let mut whole = LineBuffer::new();
            whole.extend(bytes);
            let expected = drain(&mut whole);

            let mut fragmented = LineBuffer::new();
            let mut collected = Vec::new();
            let mut rest = bytes;
            for split in splits {
                let at = split.min(rest.len());
                let (head, tail) = rest.split_at(at);
                fragmented.extend(head);
                while let Some(line) = fragmented.next_line() {
                    collected.push(line);
                }
                rest = tail;
            }
            fragmented.extend(rest);
            collected.extend(drain(&mut fragmented));

            proptest::prop_assert_eq!(collected, expected);
        }
    }
}
