//! Streaming output of a generation endpoint.
//!
//! [`EndpointOutput`] is one item of the stream an endpoint produces while
//! the model decides which tools to call.

use crate::tool::entities::ExternalToolCall;
use serde::{Deserialize, Serialize};

/// An item in a streaming endpoint response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum EndpointOutput {
    /// Incremental text chunk.
    Token(String),
    /// Tool calls annotated natively by the endpoint.
    ToolCalls(Vec<ExternalToolCall>),
    /// Cumulative generated text; replaces any accumulated tokens.
    Generated(String),
}

impl EndpointOutput {
    /// Returns the text content if this is a Token or Generated item.
    pub fn text(&self) -> Option<&str> {
        match self {
            EndpointOutput::Token(s) | EndpointOutput::Generated(s) => Some(s),
            EndpointOutput::ToolCalls(_) => None,
        }
    }
}
