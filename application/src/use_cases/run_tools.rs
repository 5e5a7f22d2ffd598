//! Run Tools use case
//!
//! Orchestrates one tool turn: select the active tools, ask the endpoint
//! which ones to call, normalize the calls and start them concurrently.
//! The returned [`ToolTurn`] streams every update to the caller and hands
//! back the results once the calls are done.

use crate::config::RunToolsConfig;
use crate::merge::MergedStream;
use crate::ports::endpoint::{Endpoint, EndpointError, EndpointRequest};
use crate::ports::metrics::{NoMetrics, ToolMetrics};
use crate::ports::tool_handler::{ToolContext, ToolSet};
use crate::ports::update_logger::{NoUpdateLogger, UpdateLogger};
use crate::use_cases::execute_tool::ToolExecutor;
use crate::use_cases::extract_calls::extract_calls;
use futures::{Stream, StreamExt};
use std::collections::{HashMap, VecDeque};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Instant;
use thiserror::Error;
use toolrun_domain::{
    CallNormalizer, DefaultCallNormalizer, Message, MessageUpdate, ToolCall, ToolResult,
    annotate_files_summary,
};
use tracing::{debug, info, warn};

/// Errors that abort a tool turn
#[derive(Error, Debug)]
pub enum RunToolsError {
    #[error("Endpoint error: {0}")]
    Endpoint(#[from] EndpointError),
}

/// Input for the RunTools use case
#[derive(Debug, Clone, Default)]
pub struct RunToolsInput {
    /// Conversation so far, with attached files
    pub messages: Vec<Message>,
    /// System preprompt, if any
    pub preprompt: Option<String>,
    /// Opaque generation settings for the endpoint
    pub generate_settings: Option<serde_json::Value>,
    /// Per-tool on/off preferences of the user
    pub preferences: HashMap<String, bool>,
    /// Whether the conversation belongs to an assistant
    pub is_assistant: bool,
}

impl RunToolsInput {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    pub fn with_preprompt(mut self, preprompt: impl Into<String>) -> Self {
        self.preprompt = Some(preprompt.into());
        self
    }

    pub fn with_generate_settings(mut self, settings: serde_json::Value) -> Self {
        self.generate_settings = Some(settings);
        self
    }

    pub fn with_preference(mut self, tool: impl Into<String>, enabled: bool) -> Self {
        self.preferences.insert(tool.into(), enabled);
        self
    }

    pub fn for_assistant(mut self) -> Self {
        self.is_assistant = true;
        self
    }
}

/// Outcome of a tool turn
#[derive(Debug, Clone, Default)]
pub struct RunToolsOutput {
    /// Normalized calls the model chose, in extraction order
    pub calls: Vec<ToolCall>,
    /// Terminal results in call order; no-op calls have none
    pub results: Vec<ToolResult>,
}

/// Use case for running the tools a model chooses
pub struct RunToolsUseCase<E: Endpoint + 'static> {
    endpoint: Arc<E>,
    tools: Arc<ToolSet>,
    metrics: Arc<dyn ToolMetrics>,
    logger: Arc<dyn UpdateLogger>,
    config: RunToolsConfig,
}

impl<E: Endpoint + 'static> RunToolsUseCase<E> {
    pub fn new(endpoint: Arc<E>, tools: Arc<ToolSet>) -> Self {
        Self {
            endpoint,
            tools,
            metrics: Arc::new(NoMetrics),
            logger: Arc::new(NoUpdateLogger),
            config: RunToolsConfig::default(),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn ToolMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn UpdateLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_config(mut self, config: RunToolsConfig) -> Self {
        self.config = config;
        self
    }

    /// Choose this turn's calls and start running them.
    ///
    /// Only an endpoint failure aborts the turn. The calls are already
    /// running when this returns; read the [`ToolTurn`] for live updates
    /// and call [`ToolTurn::results`] for the outcome.
    pub async fn execute(&self, input: RunToolsInput) -> Result<ToolTurn, RunToolsError> {
        // Phase 1: Selection
        let active = self.tools.select(&input.preferences, input.is_assistant);
        debug!(
            "Active tools: [{}]",
            active.iter().map(|t| t.name()).collect::<Vec<_>>().join(", ")
        );

        // Phase 2: Choosing calls
        let started = Instant::now();
        let messages = annotate_files_summary(&input.messages);
        let request = EndpointRequest {
            messages: messages.clone(),
            preprompt: input.preprompt.clone(),
            generate_settings: input.generate_settings.clone(),
            tools: active.iter().map(|t| t.definition.clone()).collect(),
        };
        let stream = self.endpoint.generate(request).await?;
        let extraction = extract_calls(stream).await?;

        for update in &extraction.status_updates {
            self.logger.log(update);
        }

        // Native calls are trusted as normalized; text calls are not
        let spec = active.spec();
        let mut calls = extraction.native;
        calls.extend(extraction.calls.iter().filter_map(|external| {
            match DefaultCallNormalizer.normalize(external, &spec) {
                Ok(call) => Some(call),
                Err(e) => {
                    warn!("Dropping tool call: {}", e);
                    None
                }
            }
        }));

        let model = self.endpoint.model().to_string();
        self.metrics
            .observe_time_to_choose_tools(&model, started.elapsed());
        info!(
            "Model {} chose {} tool call(s) in {:?}",
            model,
            calls.len(),
            started.elapsed()
        );

        // Phase 3: Execution
        let context = Arc::new(ToolContext {
            messages,
            preprompt: input.preprompt,
            model,
        });
        let executor = ToolExecutor::new(
            Arc::new(active),
            Arc::clone(&self.metrics),
            Arc::new(self.config.clone()),
        )
        .with_logger(Arc::clone(&self.logger));

        let sources: Vec<_> = calls
            .iter()
            .cloned()
            .map(|call| {
                let executor = executor.clone();
                let context = Arc::clone(&context);
                move |emitter| async move { executor.execute(call, context, emitter).await }
            })
            .collect();

        Ok(ToolTurn {
            calls,
            status: extraction.status_updates.into(),
            merged: MergedStream::merge(sources, self.config.event_buffer),
        })
    }
}

/// A tool turn in progress.
///
/// Yields parse problems first, then tool updates in arrival order. A
/// caller that stops reading never stalls the tools: [`ToolTurn::results`]
/// closes the stream and waits for the calls, and dropping the turn aborts
/// them.
pub struct ToolTurn {
    calls: Vec<ToolCall>,
    status: VecDeque<MessageUpdate>,
    merged: MergedStream<MessageUpdate, ToolResult>,
}

impl ToolTurn {
    /// Calls being run, in extraction order
    pub fn calls(&self) -> &[ToolCall] {
        &self.calls
    }

    /// Wait for every call and return the turn's outcome.
    ///
    /// Updates not read by then are discarded; they still reach the update
    /// logger.
    pub async fn results(self) -> RunToolsOutput {
        let results = self.merged.results().await;

        info!(
            "Tool turn finished: {} result(s), {} failed",
            results.len(),
            results.iter().filter(|r| !r.is_success()).count()
        );

        RunToolsOutput {
            calls: self.calls,
            results,
        }
    }
}

impl Stream for ToolTurn {
    type Item = MessageUpdate;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<MessageUpdate>> {
        let this = self.get_mut();
        if let Some(update) = this.status.pop_front() {
            return Poll::Ready(Some(update));
        }
        this.merged.poll_next_unpin(cx)
    }
}
