//! Tool domain value objects: immutable output types
//!
//! These types form the **output side** of a tool invocation. A tool
//! implementation produces a [`ToolOutput`]; the executor merges it with
//! the originating [`ToolCall`] into a [`ToolResult`].

use super::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// Terminal payload produced by a tool implementation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// Structured outputs (one JSON object per logical item)
    pub outputs: Vec<serde_json::Value>,
    /// Whether the outputs should be shown to the user
    #[serde(default = "default_display")]
    pub display: bool,
}

fn default_display() -> bool {
    true
}

impl ToolOutput {
    pub fn new(outputs: Vec<serde_json::Value>) -> Self {
        Self {
            outputs,
            display: true,
        }
    }

    pub fn single(output: impl Into<serde_json::Value>) -> Self {
        Self::new(vec![output.into()])
    }

    pub fn hidden(mut self) -> Self {
        self.display = false;
        self
    }
}

/// Status of a terminal tool result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolResultStatus {
    Success,
    Error,
}

impl ToolResultStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ToolResultStatus::Success => "success",
            ToolResultStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for ToolResultStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome carried by a [`ToolResult`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolOutcome {
    Success {
        outputs: Vec<serde_json::Value>,
        display: bool,
    },
    Error {
        message: String,
    },
}

/// Terminal outcome of one tool call.
///
/// Immutable once produced; always refers back to the call it answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// The call this result answers
    pub call: ToolCall,
    /// Success payload or error message
    #[serde(flatten)]
    pub outcome: ToolOutcome,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(call: ToolCall, output: ToolOutput) -> Self {
        Self {
            call,
            outcome: ToolOutcome::Success {
                outputs: output.outputs,
                display: output.display,
            },
        }
    }

    /// Create a failed result
    pub fn failure(call: ToolCall, message: impl Into<String>) -> Self {
        Self {
            call,
            outcome: ToolOutcome::Error {
                message: message.into(),
            },
        }
    }

    pub fn status(&self) -> ToolResultStatus {
        match self.outcome {
            ToolOutcome::Success { .. } => ToolResultStatus::Success,
            ToolOutcome::Error { .. } => ToolResultStatus::Error,
        }
    }

    /// Check if execution was successful
    pub fn is_success(&self) -> bool {
        self.status() == ToolResultStatus::Success
    }

    /// Outputs of a successful call (empty for failures)
    pub fn outputs(&self) -> &[serde_json::Value] {
        match &self.outcome {
            ToolOutcome::Success { outputs, .. } => outputs,
            ToolOutcome::Error { .. } => &[],
        }
    }

    /// Error message of a failed call
    pub fn message(&self) -> Option<&str> {
        match &self.outcome {
            ToolOutcome::Error { message } => Some(message),
            ToolOutcome::Success { .. } => None,
        }
    }
}
