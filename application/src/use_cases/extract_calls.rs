//! Call extraction from an endpoint stream.
//!
//! Consumes the whole endpoint stream, collecting natively annotated tool
//! calls and any ` ```json` blocks found in the final generated text.
//!
//! Native calls are taken as already normalized; only calls parsed from
//! text still need normalizing against the active tools.

use crate::ports::endpoint::{EndpointError, EndpointStream};
use futures::StreamExt;
use toolrun_domain::util::preview;
use toolrun_domain::{
    EndpointOutput, ExternalToolCall, MessageUpdate, ToolCall, extract_json_blocks,
    parse_tool_call_block,
};
use tracing::{debug, warn};

/// Outcome of draining an endpoint stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    /// Calls annotated natively by the endpoint, in arrival order
    pub native: Vec<ToolCall>,
    /// Candidate calls parsed from text blocks, in order of appearance
    pub calls: Vec<ExternalToolCall>,
    /// `StatusError` updates for blocks that could not be parsed
    pub status_updates: Vec<MessageUpdate>,
    /// Final generated text
    pub text: String,
}

/// Drain `stream` and extract every candidate tool call.
///
/// A stream error aborts extraction; it is the only fatal outcome.
pub async fn extract_calls(mut stream: EndpointStream) -> Result<Extraction, EndpointError> {
    let mut extraction = Extraction::default();

    while let Some(output) = stream.next().await {
        match output? {
            EndpointOutput::Token(token) => extraction.text.push_str(&token),
            EndpointOutput::Generated(text) => extraction.text = text,
            EndpointOutput::ToolCalls(calls) => {
                debug!("Endpoint annotated {} native tool call(s)", calls.len());
                extraction.native.extend(calls.into_iter().map(ToolCall::from));
            }
        }
    }

    for block in extract_json_blocks(&extraction.text) {
        match parse_tool_call_block(block) {
            Ok(calls) => {
                debug!("Parsed {} tool call(s) from a json block", calls.len());
                extraction.calls.extend(calls);
            }
            Err(e) => {
                warn!("{} (block: {})", e, preview(block, 120));
                extraction.status_updates.push(MessageUpdate::StatusError {
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(extraction)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use serde_json::json;

    fn outputs(items: Vec<Result<EndpointOutput, EndpointError>>) -> EndpointStream {
        Box::pin(stream::iter(items))
    }

    fn token(s: &str) -> Result<EndpointOutput, EndpointError> {
        Ok(EndpointOutput::Token(s.to_string()))
    }

    #[tokio::test]
    async fn test_tokens_accumulate_into_block() {
        let stream = outputs(vec![
            token("Searching.\n```js"),
            token("on\n[{\"tool_name\":\"websearch\","),
            token("\"parameters\":{\"query\":\"x\"}},]\n```"),
        ]);

        let extraction = extract_calls(stream).await.unwrap();
        assert_eq!(extraction.calls.len(), 1);
        assert_eq!(extraction.calls[0].tool_name, "websearch");
        assert_eq!(extraction.calls[0].parameters.get("query"), Some(&json!("x")));
        assert!(extraction.status_updates.is_empty());
    }

    #[tokio::test]
    async fn test_generated_replaces_tokens() {
        let stream = outputs(vec![
            token("```json\n[{\"tool_name\":\"stale\",\"parameters\":{}}]\n```"),
            Ok(EndpointOutput::Generated(
                "```json\n[{\"tool_name\":\"fresh\",\"parameters\":{}}]\n```".to_string(),
            )),
        ]);

        let extraction = extract_calls(stream).await.unwrap();
        let names: Vec<_> = extraction.calls.iter().map(|c| c.tool_name.as_str()).collect();
        assert_eq!(names, vec!["fresh"]);
    }

    #[tokio::test]
    async fn test_native_and_text_calls_both_collected() {
        let stream = outputs(vec![
            Ok(EndpointOutput::ToolCalls(vec![ExternalToolCall::new("native")])),
            token("```json\n[{\"tool_name\":\"texted\",\"parameters\":{}}]\n```"),
        ]);

        let extraction = extract_calls(stream).await.unwrap();
        assert_eq!(extraction.native, vec![ToolCall::new("native")]);
        let names: Vec<_> = extraction.calls.iter().map(|c| c.tool_name.as_str()).collect();
        assert_eq!(names, vec!["texted"]);
    }

    #[tokio::test]
    async fn test_native_calls_kept_verbatim() {
        let stream = outputs(vec![Ok(EndpointOutput::ToolCalls(vec![
            ExternalToolCall::new("calculator").with_param("expr", "1+1"),
        ]))]);

        let extraction = extract_calls(stream).await.unwrap();
        assert!(extraction.calls.is_empty());
        assert_eq!(
            extraction.native,
            vec![ToolCall::new("calculator").with_param("expr", "1+1")]
        );
    }

    #[tokio::test]
    async fn test_malformed_block_reports_status_and_continues() {
        let stream = outputs(vec![token(
            "```json\n[{\"tool_name\": \n```\nthen\n```json\n[{\"tool_name\":\"ok\",\"parameters\":{}}]\n```",
        )]);

        let extraction = extract_calls(stream).await.unwrap();
        assert_eq!(extraction.calls.len(), 1);
        assert_eq!(extraction.status_updates.len(), 1);
        assert!(matches!(
            &extraction.status_updates[0],
            MessageUpdate::StatusError { message } if message.starts_with("Failed to parse tool calls")
        ));
    }

    #[tokio::test]
    async fn test_non_array_block_reports_status() {
        let stream = outputs(vec![token("```json\n{\"tool_name\":\"a\",\"parameters\":{}}\n```")]);
        let extraction = extract_calls(stream).await.unwrap();
        assert!(extraction.calls.is_empty());
        assert_eq!(extraction.status_updates.len(), 1);
    }

    #[tokio::test]
    async fn test_plain_text_yields_nothing() {
        let stream = outputs(vec![token("The answer is 42.")]);
        let extraction = extract_calls(stream).await.unwrap();
        assert!(extraction.calls.is_empty());
        assert!(extraction.native.is_empty());
        assert!(extraction.status_updates.is_empty());
        assert_eq!(extraction.text, "The answer is 42.");
    }

    #[tokio::test]
    async fn test_stream_error_is_fatal() {
        let stream = outputs(vec![
            token("partial"),
            Err(EndpointError::StreamInterrupted("reset".to_string())),
        ]);
        let err = extract_calls(stream).await.unwrap_err();
        assert_eq!(err, EndpointError::StreamInterrupted("reset".to_string()));
    }
}
