//! Tool call extraction from model text.
//!
//! Models that lack native tool calling are asked to answer with a
//! ` ```json` fenced block holding an array of
//! `{"tool_name": ..., "parameters": {...}}` objects. This module finds those
//! blocks and turns them into [`ExternalToolCall`]s.
//!
//! Parsing is lenient: a single trailing comma before the closing fence is
//! stripped, and comments, trailing commas and unquoted property names
//! inside the JSON are accepted.

use super::entities::ExternalToolCall;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

const JSON_BLOCK_PATTERN: &str = r"(?s)```json(.*?)```";

static JSON_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(JSON_BLOCK_PATTERN).expect("json block pattern is hardcoded and must be valid")
});

/// Why a fenced block did not yield a list of calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseFailure {
    #[error("Failed to parse tool calls: {0}")]
    Malformed(String),

    #[error("Failed to parse tool calls: expected a JSON array")]
    NotAnArray,

    #[error("Failed to parse tool calls: empty block")]
    Empty,
}

/// Bodies of every ` ```json ... ``` ` block in `text`, in order of
/// appearance. Blocks are matched non-greedily and never overlap.
pub fn extract_json_blocks(text: &str) -> Vec<&str> {
    JSON_BLOCK
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}

/// Parse JSON with comments, trailing commas and unquoted keys allowed.
///
/// The only place lenient parsing happens.
pub fn parse_lenient_json(text: &str) -> Result<serde_json::Value, ParseFailure> {
    let options = jsonc_parser::ParseOptions {
        allow_comments: true,
        allow_trailing_commas: true,
        allow_loose_object_property_names: true,
    };
    jsonc_parser::parse_to_serde_value(text, &options)
        .map_err(|e| ParseFailure::Malformed(e.to_string()))?
        .ok_or(ParseFailure::Empty)
}

/// Parse one fenced block body into external calls.
///
/// The block must hold a JSON array. Elements that are not shaped like a
/// call are dropped silently; a structurally valid block may therefore
/// yield no calls at all.
pub fn parse_tool_call_block(block: &str) -> Result<Vec<ExternalToolCall>, ParseFailure> {
    let trimmed = block.trim();
    let trimmed = trimmed.strip_suffix(',').unwrap_or(trimmed).trim_end();
    if trimmed.is_empty() {
        return Err(ParseFailure::Empty);
    }

    match parse_lenient_json(trimmed)? {
        serde_json::Value::Array(items) => {
            Ok(items.iter().filter_map(ExternalToolCall::from_value).collect())
        }
        _ => Err(ParseFailure::NotAnArray),
    }
}
