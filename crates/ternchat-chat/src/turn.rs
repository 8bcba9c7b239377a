use std::sync::Arc;

use futures_util::StreamExt;

use ternchat_client::ChatTransport;
use ternchat_models::{ChatRequest, RequestOptions, StreamChunk, ToolCall, Usage};
use ternchat_stream::{EventDecoder, LineBuffer, SseEvent, ToolCallAssembler};
use ternchat_toolcore::ToolRegistry;

use crate::error::TurnError;
use crate::events::{ChatEvent, EventBus};
use crate::history::ChatHistory;

/// Upper bound on tool round-trips within one turn, to stop runaway
/// tool-call loops.
pub const DEFAULT_MAX_ITERATIONS: usize = 5;

/// Everything one streamed response produced.
#[derive(Debug, Default)]
struct StreamOutcome {
    content: String,
    /// Completed calls in completion order, not index order.
    tool_calls: Vec<ToolCall>,
    finish_reason: Option<String>,
    usage: Option<Usage>,
}

/// Drives one conversation turn to a deterministic conclusion: request,
/// stream, execute tools, resubmit, repeat until the model answers in plain
/// text or a failure/cap ends the turn.
///
/// Each streamed response gets its own line buffer and assembler, so no
/// decoding state ever leaks between requests.
pub struct TurnController {
    transport: Arc<dyn ChatTransport>,
    registry: ToolRegistry,
    events: EventBus,
    options: RequestOptions,
    max_iterations: usize,
    total_usage: Usage,
}

impl TurnController {
    pub fn new(transport: Arc<dyn ChatTransport>, options: RequestOptions) -> Self {
        Self {
            transport,
            registry: ToolRegistry::new(),
            events: EventBus::new(),
            options,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            total_usage: Usage::default(),
        }
    }

    pub fn with_registry(mut self, registry: ToolRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Register an observer for turn events.
    pub fn on<F>(&mut self, handler: F)
    where
        F: Fn(&ChatEvent) + Send + Sync + 'static,
    {
        self.events.on(handler);
    }

    /// Token usage accumulated across all round-trips of this controller.
    pub fn total_usage(&self) -> &Usage {
        &self.total_usage
    }

    /// Run one turn against the given history. On success the final assistant
    /// text is returned and the history has gained one assistant message per
    /// round plus one tool message per executed call. On failure the history
    /// keeps whatever was appended before the failure.
    pub async fn run(&mut self, history: &mut ChatHistory) -> Result<String, TurnError> {
        if self.options.model.trim().is_empty() {
            return Err(TurnError::Validation("model must not be empty".to_string()));
        }
        if history.is_empty() {
            return Err(TurnError::Validation(
                "history must contain at least one message".to_string(),
            ));
        }

        let mut tool_rounds = 0;
        loop {
            let request = self.build_request(history);
            let outcome = self.stream_completion(&request).await?;
            if let Some(usage) = &outcome.usage {
                self.total_usage.add(usage);
            }

            if outcome.tool_calls.is_empty() {
                history.push_assistant(outcome.content.clone());
                return Ok(outcome.content);
            }

            if tool_rounds >= self.max_iterations {
                let limit = self.max_iterations;
                self.events.emit(&ChatEvent::StreamError {
                    message: format!("exceeded maximum of {limit} tool-call iterations"),
                });
                return Err(TurnError::MaxIterationsExceeded { limit });
            }
            tool_rounds += 1;

            let content = (!outcome.content.is_empty()).then(|| outcome.content.clone());
            history.push_assistant_with_tool_calls(content, outcome.tool_calls.clone());

            // Execute in completion order; an execution error becomes the
            // tool message content so the model can react to the failure.
            for call in &outcome.tool_calls {
                self.events.emit(&ChatEvent::ToolReceived { call: call.clone() });
                self.events.emit(&ChatEvent::ToolExecuting {
                    call_id: call.id.clone(),
                    name: call.function.name.clone(),
                });

                let content = match self.registry.execute_call(call).await {
                    Ok(result) => {
                        self.events.emit(&ChatEvent::ToolExecuted {
                            call_id: call.id.clone(),
                            result: result.clone(),
                        });
                        result
                    }
                    Err(e) => {
                        let error = e.to_string();
                        self.events.emit(&ChatEvent::ToolError {
                            call_id: call.id.clone(),
                            error: error.clone(),
                        });
                        error
                    }
                };
                history.push_tool(content, call.id.clone(), Some(call.function.name.clone()));
            }
        }
    }

    fn build_request(&self, history: &ChatHistory) -> ChatRequest {
        let tools = self.registry.tool_specs();
        let tool_choice = if tools.is_empty() {
            None
        } else {
            self.options
                .tool_choice
                .clone()
                .or_else(|| Some("auto".to_string()))
        };

        ChatRequest {
            model: self.options.model.clone(),
            messages: history.messages().to_vec(),
            tools,
            tool_choice,
            temperature: self.options.temperature,
            max_tokens: self.options.max_tokens,
            stream: Some(true),
        }
    }

    /// Consume one streamed response to its end, reassembling lines, chunks
    /// and tool calls. Partial tool calls still pending when the stream ends
    /// are discarded, never executed.
    async fn stream_completion(&self, request: &ChatRequest) -> Result<StreamOutcome, TurnError> {
        let mut byte_stream = match self.transport.post_streaming(request).await {
            Ok(stream) => stream,
            Err(e) => {
                self.events.emit(&ChatEvent::StreamError { message: e.to_string() });
                return Err(e.into());
            }
        };
        self.events.emit(&ChatEvent::StreamStart);

        let mut lines = LineBuffer::new();
        let mut decoder = EventDecoder::new();
        let mut assembler = ToolCallAssembler::new();
        let mut outcome = StreamOutcome::default();

        'read: while let Some(next) = byte_stream.next().await {
            let bytes = match next {
                Ok(bytes) => bytes,
                Err(e) => {
                    self.events.emit(&ChatEvent::StreamError { message: e.to_string() });
                    return Err(e.into());
                }
            };
            lines.extend(&bytes);

            while let Some(line) = lines.next_line() {
                let event = match decoder.decode(&line) {
                    Ok(event) => event,
                    Err(e) => {
                        self.events.emit(&ChatEvent::StreamError { message: e.to_string() });
                        return Err(e.into());
                    }
                };
                match event {
                    SseEvent::Done => break 'read,
                    SseEvent::Chunk(chunk) => {
                        self.process_chunk(chunk, &mut assembler, &mut outcome)
                    }
                    SseEvent::Ignored => {}
                    SseEvent::Malformed { error } => {
                        self.events.emit(&ChatEvent::StreamError {
                            message: format!("skipping malformed stream line: {error}"),
                        });
                    }
                }
            }
        }

        self.events.emit(&ChatEvent::StreamEnd {
            finish_reason: outcome.finish_reason.clone(),
        });
        Ok(outcome)
    }

    fn process_chunk(
        &self,
        chunk: StreamChunk,
        assembler: &mut ToolCallAssembler,
        outcome: &mut StreamOutcome,
    ) {
        if let Some(usage) = chunk.usage {
            outcome.usage = Some(usage);
        }
        let Some(choice) = chunk.choices.into_iter().next() else {
            return;
        };

        if let Some(content) = choice.delta.content {
            if !content.is_empty() {
                outcome.content.push_str(&content);
                self.events.emit(&ChatEvent::StreamContent { delta: content });
            }
        }

        if let Some(deltas) = choice.delta.tool_calls {
            for delta in &deltas {
                if let Some(call) = assembler.feed(delta) {
                    self.events.emit(&ChatEvent::StreamToolCall { call: call.clone() });
                    outcome.tool_calls.push(call);
                }
            }
        }

        if let Some(reason) = choice.finish_reason {
            outcome.finish_reason = Some(reason);
        }
    }
}

impl std::fmt::Debug for TurnController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TurnController")
            .field("registry", &self.registry)
            .field("events", &self.events)
            .field("options", &self.options)
            .field("max_iterations", &self.max_iterations)
            .finish()
    }
}
