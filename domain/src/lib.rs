//! Domain layer for toolrun
//!
//! Pure types and rules of the tool-call pipeline. No I/O and no async;
//! the application layer drives these through its ports.
//!
//! # Core Concepts
//!
//! - **Tool definitions**: what a tool is called, what inputs it declares and
//!   whether it is offered by default
//! - **Calls**: untrusted [`ExternalToolCall`]s extracted from model output,
//!   normalized into [`ToolCall`]s
//! - **Updates**: the [`MessageUpdate`] stream a caller observes while calls
//!   run

pub mod session;
pub mod tool;
pub mod util;

pub use session::{
    entities::{Message, MessageFile, Role, annotate_files_summary, file_by_index, indexed_files},
    stream::EndpointOutput,
    update::{MessageUpdate, ToolCallId},
};
pub use tool::{
    entities::{ExternalToolCall, ToolCall, ToolDefinition, ToolInput, ToolSpec, WEB_SEARCH},
    extraction::{ParseFailure, extract_json_blocks, parse_lenient_json, parse_tool_call_block},
    normalize::{CallNormalizer, DefaultCallNormalizer, NormalizeError},
    selection::{is_tool_enabled, select_tools},
    value_objects::{ToolOutcome, ToolOutput, ToolResult, ToolResultStatus},
};
