use ternchat_models::{Message, Role, ToolCall};

/// Append-only, ordered conversation history.
///
/// Messages are only ever appended; failures leave whatever was appended
/// before them in place (no rollback). Each conversation owns its own
/// history, never shared across turns running concurrently.
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    messages: Vec<Message>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a history with a system prompt.
    pub fn with_system(prompt: impl Into<String>) -> Self {
        let mut history = Self::new();
        history.push(Message::system(prompt));
        history
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(Message::assistant(content));
    }

    pub fn push_assistant_with_tool_calls(
        &mut self,
        content: Option<String>,
        tool_calls: Vec<ToolCall>,
    ) {
        self.push(Message::assistant_with_tool_calls(content, tool_calls));
    }

    pub fn push_tool(
        &mut self,
        content: impl Into<String>,
        tool_call_id: impl Into<String>,
        name: Option<String>,
    ) {
        self.push(Message::tool(content, tool_call_id, name));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }
}
