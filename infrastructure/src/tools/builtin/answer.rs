//! `directly_answer` tool: the model's way of saying "no tool needed".
//!
//! Calls to this tool are recognized by the engine and never executed; the
//! handler exists only so the tool can live in a [`ToolSet`] like any other.
//!
//! [`ToolSet`]: toolrun_application::ToolSet

use futures::stream;
use toolrun_application::{ToolContext, ToolEvent, ToolEventStream, ToolFailure, ToolHandler};
use toolrun_domain::{ToolCall, ToolDefinition, ToolOutput};

/// Canonical tool name
pub const DIRECTLY_ANSWER: &str = "directly_answer";

pub fn directly_answer_definition() -> ToolDefinition {
    ToolDefinition::new(
        DIRECTLY_ANSWER,
        "Answer the user directly without calling any other tool. Use this when no tool is needed.",
    )
    .with_display_name("Directly answer")
    .with_alias("answer")
    .no_op()
    .locked(true)
    .on_by_default(true)
}

/// Handler for the no-op tool
#[derive(Debug, Clone, Default)]
pub struct DirectlyAnswer;

impl ToolHandler for DirectlyAnswer {
    fn call(&self, _call: &ToolCall, _context: &ToolContext) -> ToolEventStream {
        Box::pin(stream::iter([Ok::<_, ToolFailure>(ToolEvent::Output(
            ToolOutput::new(Vec::new()).hidden(),
        ))]))
    }
}
