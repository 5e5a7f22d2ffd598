//! Replay endpoint.
//!
//! Provides [`ReplayEndpoint`], which replays a recorded model output instead
//! of talking to a live model. Two transcript shapes are understood:
//!
//! - plain text, streamed as tokens split after each whitespace character
//!   and closed by a `Generated` item with the full text
//! - a `.json` file of the form `{"tool_calls": [...], "text": "..."}`,
//!   replayed as one native `ToolCalls` item (then `text`, if present)

use async_trait::async_trait;
use futures::stream;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toolrun_application::{Endpoint, EndpointError, EndpointRequest, EndpointStream};
use toolrun_domain::{EndpointOutput, ExternalToolCall};
use tracing::{debug, warn};

/// Model label used when none is given
pub const REPLAY_MODEL: &str = "replay";

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Failed to read transcript {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid JSON transcript {path}: {source}")]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct JsonTranscript {
    #[serde(default)]
    tool_calls: Vec<serde_json::Value>,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
enum Script {
    Text(String),
    Native {
        calls: Vec<ExternalToolCall>,
        text: Option<String>,
    },
}

/// Endpoint that replays a fixed transcript on every `generate`.
#[derive(Debug, Clone)]
pub struct ReplayEndpoint {
    model: String,
    script: Script,
}

impl ReplayEndpoint {
    /// Replay `text` as a plain model output.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            model: REPLAY_MODEL.to_string(),
            script: Script::Text(text.into()),
        }
    }

    /// Replay natively annotated calls, optionally followed by text.
    pub fn from_calls(calls: Vec<ExternalToolCall>, text: Option<String>) -> Self {
        Self {
            model: REPLAY_MODEL.to_string(),
            script: Script::Native { calls, text },
        }
    }

    /// Load a transcript file. Files with a `.json` extension are read as
    /// native tool call transcripts, anything else as plain text.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ReplayError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if !is_json {
            debug!("Replaying text transcript {}", path.display());
            return Ok(Self::from_text(content));
        }

        let transcript: JsonTranscript =
            serde_json::from_str(&content).map_err(|source| ReplayError::InvalidJson {
                path: path.to_path_buf(),
                source,
            })?;

        let mut calls = Vec::with_capacity(transcript.tool_calls.len());
        for value in &transcript.tool_calls {
            match ExternalToolCall::from_value(value) {
                Some(call) => calls.push(call),
                None => warn!("Skipping malformed tool call in {}: {}", path.display(), value),
            }
        }
        debug!(
            "Replaying {} native tool call(s) from {}",
            calls.len(),
            path.display()
        );
        Ok(Self::from_calls(calls, transcript.text))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn outputs(&self) -> Vec<Result<EndpointOutput, EndpointError>> {
        match &self.script {
            Script::Text(text) => text
                .split_inclusive(char::is_whitespace)
                .map(|token| Ok(EndpointOutput::Token(token.to_string())))
                .chain(std::iter::once(Ok(EndpointOutput::Generated(text.clone()))))
                .collect(),
            Script::Native { calls, text } => {
                let mut outputs = vec![Ok(EndpointOutput::ToolCalls(calls.clone()))];
                if let Some(text) = text {
                    outputs.push(Ok(EndpointOutput::Generated(text.clone())));
                }
                outputs
            }
        }
    }
}

#[async_trait]
impl Endpoint for ReplayEndpoint {
    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: EndpointRequest) -> Result<EndpointStream, EndpointError> {
        debug!(
            "Replay endpoint '{}' offered {} tool(s) over {} message(s)",
            self.model,
            request.tools.len(),
            request.messages.len()
        );
        Ok(Box::pin(stream::iter(self.outputs())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn request() -> EndpointRequest {
        EndpointRequest {
            messages: vec![],
            preprompt: None,
            generate_settings: None,
            tools: vec![],
        }
    }

    async fn collect(endpoint: &ReplayEndpoint) -> Vec<EndpointOutput> {
        endpoint
            .generate(request())
            .await
            .unwrap()
            .map(|item| item.unwrap())
            .collect()
            .await
    }

    #[tokio::test]
    async fn test_text_tokens_preserve_whitespace() {
        let text = "Let me check.\n```json\n[{\"tool_name\": \"websearch\"}]\n```";
        let outputs = collect(&ReplayEndpoint::from_text(text)).await;

        let (last, tokens) = outputs.split_last().unwrap();
        assert_eq!(last, &EndpointOutput::Generated(text.to_string()));
        assert!(tokens.len() > 1);
        let joined: String = tokens.iter().filter_map(|t| t.text()).collect();
        assert_eq!(joined, text);
    }

    #[tokio::test]
    async fn test_json_transcript_replays_native_calls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turn.json");
        std::fs::write(
            &path,
            r#"{"tool_calls": [
                {"tool_name": "websearch", "parameters": {"query": "rust"}},
                {"tool_name": "broken"}
            ]}"#,
        )
        .unwrap();

        let endpoint = ReplayEndpoint::from_file(&path).unwrap().with_model("recorded");
        assert_eq!(endpoint.model(), "recorded");

        let outputs = collect(&endpoint).await;
        assert_eq!(outputs.len(), 1);
        let EndpointOutput::ToolCalls(calls) = &outputs[0] else {
            panic!("expected native tool calls, got {:?}", outputs[0]);
        };
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].tool_name, "websearch");
    }

    #[tokio::test]
    async fn test_json_transcript_with_text() {
        let endpoint = ReplayEndpoint::from_calls(vec![], Some("done".to_string()));
        let outputs = collect(&endpoint).await;
        assert_eq!(
            outputs,
            vec![
                EndpointOutput::ToolCalls(vec![]),
                EndpointOutput::Generated("done".to_string()),
            ]
        );
    }

    #[test]
    fn test_non_json_extension_is_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turn.txt");
        std::fs::write(&path, "{\"tool_calls\": []}").unwrap();

        let endpoint = ReplayEndpoint::from_file(&path).unwrap();
        assert_eq!(endpoint.model(), REPLAY_MODEL);
        assert!(matches!(endpoint.script, Script::Text(_)));
    }

    #[test]
    fn test_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.txt");
        assert!(matches!(
            ReplayEndpoint::from_file(&missing),
            Err(ReplayError::Read { .. })
        ));

        let invalid = dir.path().join("bad.json");
        std::fs::write(&invalid, "not json").unwrap();
        let err = ReplayEndpoint::from_file(&invalid).unwrap_err();
        assert!(matches!(err, ReplayError::InvalidJson { .. }));
        assert!(err.to_string().contains("bad.json"));
    }
}
