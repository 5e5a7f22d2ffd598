//! Tool domain module
//!
//! Pure definitions for the tool-call pipeline: what a tool declares, what
//! the model asked for, and what a call produced.
//!
//! ```text
//! model text ──▶ extraction ──▶ ExternalToolCall ──▶ normalize ──▶ ToolCall ──▶ ToolResult
//!                                                       ▲
//!                         ToolSpec ──▶ selection ───────┘
//! ```
//!
//! # Key Types
//!
//! - [`ToolDefinition`]: declared name, inputs and availability flags
//! - [`ToolSpec`]: ordered set of definitions with alias resolution
//! - [`ExternalToolCall`]: untrusted call as produced by the model
//! - [`ToolCall`]: resolved call with defaults filled in
//! - [`ToolResult`]: terminal success or failure of one call
//!
//! Execution lives in the application layer; nothing here performs I/O.

pub mod entities;
pub mod extraction;
pub mod normalize;
pub mod selection;
pub mod value_objects;

pub use entities::{ExternalToolCall, ToolCall, ToolDefinition, ToolInput, ToolSpec, WEB_SEARCH};
pub use extraction::{ParseFailure, extract_json_blocks, parse_lenient_json, parse_tool_call_block};
pub use normalize::{CallNormalizer, DefaultCallNormalizer, NormalizeError};
pub use selection::{is_tool_enabled, select_tools};
pub use value_objects::{ToolOutcome, ToolOutput, ToolResult, ToolResultStatus};
