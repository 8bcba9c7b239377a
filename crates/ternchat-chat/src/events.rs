use std::panic::{catch_unwind, AssertUnwindSafe};

use colored::Colorize;
use ternchat_models::ToolCall;

/// Everything observable about a turn, as a closed set of variants so
/// handler mismatches are compile errors rather than stringly-typed bugs.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    StreamStart,
    StreamContent { delta: String },
    StreamToolCall { call: ToolCall },
    StreamEnd { finish_reason: Option<String> },
    StreamError { message: String },
    ToolReceived { call: ToolCall },
    ToolExecuting { call_id: String, name: String },
    ToolExecuted { call_id: String, result: String },
    ToolError { call_id: String, error: String },
}

type EventHandler = Box<dyn Fn(&ChatEvent) + Send + Sync>;

/// Synchronous fan-out of turn events to registered observers.
///
/// Observers run inline with the producing call, in registration order.
/// They own no state; a panicking observer is caught and reported so it can
/// never corrupt the turn state machine.
#[derive(Default)]
pub struct EventBus {
    handlers: Vec<EventHandler>,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handler_count", &self.handlers.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on<F>(&mut self, handler: F)
    where
        F: Fn(&ChatEvent) + Send + Sync + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn emit(&self, event: &ChatEvent) {
        for handler in &self.handlers {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(|| handler(event))) {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                eprintln!(
                    "{} {}",
                    "event observer panicked:".bright_red().bold(),
                    reason
                );
            }
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }
}
