//! Tool handler port
//!
//! A tool is a [`ToolDefinition`] paired with a [`ToolHandler`] that knows
//! how to run it. Handlers report progress and their terminal output as a
//! stream of [`ToolEvent`]s.

use futures::stream::BoxStream;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use toolrun_domain::{Message, ToolCall, ToolDefinition, ToolOutput, ToolSpec, select_tools};

/// Internal failure of a tool.
///
/// The message is logged but never shown to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ToolFailure {
    pub message: String,
}

impl ToolFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for ToolFailure {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for ToolFailure {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// One event produced by a running tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolEvent {
    /// Intermediate progress, forwarded to the caller
    Progress(String),
    /// Terminal output; nothing after it is read
    Output(ToolOutput),
}

/// Event stream of one tool invocation.
pub type ToolEventStream = BoxStream<'static, Result<ToolEvent, ToolFailure>>;

/// Read-only context shared by every tool call of a turn.
#[derive(Debug, Clone, Default)]
pub struct ToolContext {
    /// Conversation messages, including attached files
    pub messages: Vec<Message>,
    /// System preprompt, if any
    pub preprompt: Option<String>,
    /// Model that chose the calls
    pub model: String,
}

/// Executable side of a tool
pub trait ToolHandler: Send + Sync {
    /// Start the tool for `call`.
    ///
    /// The returned stream must yield a [`ToolEvent::Output`] to succeed;
    /// ending without one counts as a failure.
    fn call(&self, call: &ToolCall, context: &ToolContext) -> ToolEventStream;
}

/// A tool definition with its handler.
#[derive(Clone)]
pub struct Tool {
    pub definition: ToolDefinition,
    pub handler: Arc<dyn ToolHandler>,
}

impl Tool {
    pub fn new(definition: ToolDefinition, handler: Arc<dyn ToolHandler>) -> Self {
        Self {
            definition,
            handler,
        }
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

/// Ordered set of executable tools.
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    tools: Vec<Tool>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a tool; a tool with the same name replaces the earlier one in
    /// place.
    pub fn register(mut self, tool: Tool) -> Self {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
        self
    }

    /// Look up a tool by canonical name.
    pub fn get(&self, name: &str) -> Option<&Tool> {
        self.tools.iter().find(|t| t.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tool> {
        self.tools.iter()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Definitions only, in registration order.
    pub fn spec(&self) -> ToolSpec {
        self.tools.iter().map(|t| t.definition.clone()).collect()
    }

    /// Tools active for one turn.
    pub fn select(&self, preferences: &HashMap<String, bool>, is_assistant: bool) -> ToolSet {
        let selected = select_tools(self.tools.iter().map(|t| &t.definition), preferences, is_assistant);
        let tools = selected
            .into_iter()
            .filter_map(|definition| self.get(&definition.name).cloned())
            .collect();
        ToolSet { tools }
    }
}

impl FromIterator<Tool> for ToolSet {
    fn from_iter<I: IntoIterator<Item = Tool>>(iter: I) -> Self {
        iter.into_iter().fold(ToolSet::new(), ToolSet::register)
    }
}
