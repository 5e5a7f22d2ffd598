//! Application-level configuration.
//!
//! Controls how a tool turn behaves: how many updates may be buffered
//! between running tools and the caller, and what a caller sees when a tool
//! fails.

/// Default capacity of the channel shared by concurrently running tools.
pub const DEFAULT_EVENT_BUFFER: usize = 64;

/// Behavior configuration for [`RunToolsUseCase`](crate::RunToolsUseCase).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunToolsConfig {
    /// Maximum number of updates buffered before producers wait.
    pub event_buffer: usize,
    /// Override for the message shown when a tool fails.
    ///
    /// `None` uses a message naming the tool. Internal error detail is never
    /// exposed to the caller either way.
    pub generic_error_message: Option<String>,
}

impl Default for RunToolsConfig {
    fn default() -> Self {
        Self {
            event_buffer: DEFAULT_EVENT_BUFFER,
            generic_error_message: None,
        }
    }
}

impl RunToolsConfig {
    pub fn with_event_buffer(mut self, event_buffer: usize) -> Self {
        self.event_buffer = event_buffer.max(1);
        self
    }

    pub fn with_generic_error_message(mut self, message: impl Into<String>) -> Self {
        self.generic_error_message = Some(message.into());
        self
    }

    /// Caller-facing message for a failed call to `tool`.
    pub fn error_message_for(&self, tool: &str) -> String {
        match &self.generic_error_message {
            Some(message) => message.clone(),
            None => format!("An error occurred while calling the tool \"{}\"", tool),
        }
    }
}
