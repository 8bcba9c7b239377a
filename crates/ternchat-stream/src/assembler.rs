use std::collections::HashMap;

use ternchat_models::{FunctionCall, StreamToolCallDelta, ToolCall};

/// Per-call accumulation state, keyed by the delta's stream index.
#[derive(Debug, Default)]
struct PendingToolCall {
    id: Option<String>,
    call_type: Option<String>,
    name: String,
    arguments: String,
}

/// Reassembles tool calls whose argument strings arrive as a token-by-token
/// stream of fragments across many chunks.
///
/// Fragments are appended in arrival order; a call is emitted as soon as the
/// accumulated arguments parse as JSON and a non-empty function name is
/// known. Multiple calls (distinct indices) may be in flight at once and may
/// complete in any order.
#[derive(Debug, Default)]
pub struct ToolCallAssembler {
    pending: HashMap<usize, PendingToolCall>,
}

impl ToolCallAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one tool-call delta, returning the completed call if this
    /// fragment made its accumulated arguments valid JSON.
    pub fn feed(&mut self, delta: &StreamToolCallDelta) -> Option<ToolCall> {
        let entry = self.pending.entry(delta.index).or_default();

        if let Some(id) = &delta.id {
            if !id.is_empty() {
                entry.id = Some(id.clone());
            }
        }
        if let Some(call_type) = &delta.call_type {
            entry.call_type = Some(call_type.clone());
        }
        if let Some(function) = &delta.function {
            if let Some(name) = &function.name {
                if !name.is_empty() {
                    entry.name = name.clone();
                }
            }
            if let Some(fragment) = &function.arguments {
                entry.arguments.push_str(fragment);
            }
        }

        if entry.name.is_empty() {
            return None;
        }
        if serde_json::from_str::<serde_json::Value>(&entry.arguments).is_err() {
            return None;
        }

        let done = self
            .pending
            .remove(&delta.index)
            .expect("entry exists, it was just updated");
        Some(ToolCall {
            id: done.id.unwrap_or_else(generated_call_id),
            call_type: done.call_type.unwrap_or_else(|| "function".to_string()),
            function: FunctionCall {
                name: done.name,
                arguments: done.arguments,
            },
        })
    }

    /// Number of calls still accumulating. Anything left here at stream end
    /// is a partial call and must be discarded, never executed.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Clear all accumulation state at the start of a new stream.
    pub fn reset(&mut self) {
        self.pending.clear();
    }
}

fn generated_call_id() -> String {
    format!("call_{}", uuid::Uuid::new_v4().simple())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use ternchat_models::StreamFunctionDelta;

    fn delta(
        index: usize,
        id: Option<&str>,
        name: Option<&str>,
        arguments: Option<&str>,
    ) -> StreamToolCallDelta {
        StreamToolCallDelta {
            index,
            id: id.map(str::to_string),
            call_type: id.map(|_| "function".to_string()),
            function: Some(StreamFunctionDelta {
                name: name.map(str::to_string),
                arguments: arguments.map(str::to_string),
            }),
        }
    }

    #[test]
    fn assembles_fragmented_arguments_in_order() {
        let mut assembler = ToolCallAssembler::new();
        assert!(assembler.feed(&delta(0, Some("call_1"), Some("calculator"), None)).is_none());
        assert!(assembler.feed(&delta(0, None, None, Some("{\"ex"))).is_none());
        assert!(assembler.feed(&delta(0, None, None, Some("pression\":\"2"))).is_none());
        let call = assembler
            .feed(&delta(0, None, None, Some("+2\"}")))
            .expect("arguments are complete JSON now");

        assert_eq!(call.id, "call_1");
        assert_eq!(call.call_type, "function");
        assert_eq!(call.function.name, "calculator");
        assert_eq!(call.function.arguments, r#"{"expression":"2+2"}"#);
        assert_eq!(assembler.pending_count(), 0);
    }

    #[test]
    fn empty_object_arguments_complete() {
        let mut assembler = ToolCallAssembler::new();
        let call = assembler
            .feed(&delta(0, Some("call_1"), Some("ping"), Some("{}")))
            .expect("empty object is valid JSON");
        assert_eq!(call.function.arguments, "{}");
    }

    #[test]
    fn empty_buffer_does_not_complete() {
        let mut assembler = ToolCallAssembler::new();
        assert!(assembler.feed(&delta(0, Some("call_1"), Some("ping"), None)).is_none());
        assert_eq!(assembler.pending_count(), 1);
    }

    #[test]
    fn requires_name_before_emitting() {
        let mut assembler = ToolCallAssembler::new();
        // Arguments are already valid JSON but the name is unknown.
        assert!(assembler.feed(&delta(0, Some("call_1"), None, Some("{}"))).is_none());
        let call = assembler
            .feed(&delta(0, None, Some("ping"), None))
            .expect("name arrived");
        assert_eq!(call.function.name, "ping");
        assert_eq!(call.function.arguments, "{}");
    }

    #[test]
    fn generates_id_when_server_omits_one() {
        let mut assembler = ToolCallAssembler::new();
        let call = assembler
            .feed(&delta(0, None, Some("ping"), Some("{}")))
            .unwrap();
        assert!(call.id.starts_with("call_"), "got id {}", call.id);
    }

    #[test]
    fn interleaved_indices_complete_independently() {
        let mut assembler = ToolCallAssembler::new();
        assert!(assembler.feed(&delta(0, Some("a"), Some("first"), Some("{\"x\":"))).is_none());
        assert!(assembler.feed(&delta(1, Some("b"), Some("second"), Some("{\"y\":"))).is_none());
        // Index 1 completes before index 0.
        let second = assembler.feed(&delta(1, None, None, Some("2}"))).unwrap();
        assert_eq!(second.function.name, "second");
        assert_eq!(assembler.pending_count(), 1);
        let first = assembler.feed(&delta(0, None, None, Some("1}"))).unwrap();
        assert_eq!(first.function.name, "first");
        assert_eq!(first.function.arguments, r#"{"x":1}"#);
    }

    #[test]
    fn reset_discards_partial_calls() {
        let mut assembler = ToolCallAssembler::new();
        assembler.feed(&delta(0, Some("call_1"), Some("calculator"), Some("{\"ex")));
        assert_eq!(assembler.pending_count(), 1);
        assembler.reset();
        assert_eq!(assembler.pending_count(), 0);
    }

    proptest::proptest! {
        /// However the argument string is chunked, exactly one call is
        /// emitted and its arguments equal the concatenation.
        #[test]
        fn chunking_is_invisible(splits in proptest::collection::vec(0usize..24, 0..6)) {
            let arguments = r#"{"expression":"2+2","precision":10}"#;
            let mut assembler = ToolCallAssembler::new();
            assert!(assembler.feed(&delta(0, Some("call_1"), Some("calculator"), None)).is_none());

            let mut completions = Vec::new();
            let mut rest = arguments;
            for split in splits {
                let at = split.min(rest.len());
                // Keep splits on char boundaries; arguments here are ASCII.
                let (head, tail) = rest.split_at(at);
                if !head.is_empty() {
                    if let Some(call) = assembler.feed(&delta(0, None, None, Some(head))) {
                        completions.push(call);
                    }
                }
                rest = tail;
            }
            if !rest.is_empty() {
                if let Some(call) = assembler.feed(&delta(0, None, None, Some(rest))) {
                    completions.push(call);
                }
            }

            proptest::prop_assert_eq!(completions.len(), 1);
            proptest::prop_assert_eq!(completions[0].function.arguments.as_str(), arguments);
        }
    }
}
