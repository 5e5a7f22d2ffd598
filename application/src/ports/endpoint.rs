//! Endpoint port
//!
//! Defines the interface to the model endpoint that decides which tools to
//! call for a turn.

use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;
use toolrun_domain::{EndpointOutput, Message, ToolDefinition};

/// Errors that can occur while talking to an endpoint
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// Stream of outputs produced by one generation request.
pub type EndpointStream = BoxStream<'static, Result<EndpointOutput, EndpointError>>;

/// Everything an endpoint needs to decide on tool calls.
#[derive(Debug, Clone)]
pub struct EndpointRequest {
    /// Conversation, already annotated with attached file summaries
    pub messages: Vec<Message>,
    /// System preprompt, if any
    pub preprompt: Option<String>,
    /// Opaque generation settings passed through unchanged
    pub generate_settings: Option<serde_json::Value>,
    /// Tools offered for this turn, in selection order
    pub tools: Vec<ToolDefinition>,
}

/// Model endpoint
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait Endpoint: Send + Sync {
    /// Model identifier, used as a metric label
    fn model(&self) -> &str;

    /// Start a generation and return its output stream
    async fn generate(&self, request: EndpointRequest) -> Result<EndpointStream, EndpointError>;
}
