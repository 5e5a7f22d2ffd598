//! Message updates streamed to the caller during a turn.
//!
//! Every [`MessageUpdate::ToolCall`] is eventually followed by exactly one
//! [`MessageUpdate::ToolResult`] or [`MessageUpdate::ToolError`] carrying the
//! same [`ToolCallId`]. Progress updates may appear in between.

use crate::tool::entities::ToolCall;
use crate::tool::value_objects::ToolResult;
use serde::{Deserialize, Serialize};

/// Unique identifier for one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolCallId(String);

impl ToolCallId {
    /// A fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ToolCallId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An update emitted while tools are chosen and executed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageUpdate {
    /// A tool call is about to run.
    ToolCall { id: ToolCallId, call: ToolCall },
    /// Progress reported by a running tool.
    ToolProgress { id: ToolCallId, message: String },
    /// A tool call finished successfully.
    ToolResult { id: ToolCallId, result: ToolResult },
    /// A tool call failed.
    ToolError { id: ToolCallId, message: String },
    /// A turn-level problem that does not abort the turn.
    StatusError { message: String },
}

impl MessageUpdate {
    pub fn id(&self) -> Option<&ToolCallId> {
        match self {
            MessageUpdate::ToolCall { id, .. }
            | MessageUpdate::ToolProgress { id, .. }
            | MessageUpdate::ToolResult { id, .. }
            | MessageUpdate::ToolError { id, .. } => Some(id),
            MessageUpdate::StatusError { .. } => None,
        }
    }

    /// Whether this update ends a tool call.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            MessageUpdate::ToolResult { .. } | MessageUpdate::ToolError { .. }
        )
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MessageUpdate::ToolCall { .. } => "tool_call",
            MessageUpdate::ToolProgress { .. } => "tool_progress",
            MessageUpdate::ToolResult { .. } => "tool_result",
            MessageUpdate::ToolError { .. } => "tool_error",
            MessageUpdate::StatusError { .. } => "status_error",
        }
    }
}
