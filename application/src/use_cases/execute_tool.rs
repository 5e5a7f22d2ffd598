//! Single tool call execution.
//!
//! Runs one normalized [`ToolCall`] against the active tool set and reports
//! its lifecycle through an [`Emitter`]:
//!
//! ```text
//! ToolCall ──▶ ToolProgress* ──▶ ToolResult
//!                           └──▶ ToolError
//! ```
//!
//! Every update is written to the [`UpdateLogger`] as it is emitted, so the
//! log stays complete even when nobody reads the merged stream.
//!
//! Failures never escape: a handler error, a stream that ends without
//! output, or a panic inside the handler all become an error result with a
//! generic message. The internal detail only goes to the log.

use crate::config::RunToolsConfig;
use crate::merge::Emitter;
use crate::ports::metrics::ToolMetrics;
use crate::ports::tool_handler::{ToolContext, ToolEvent, ToolFailure, ToolHandler, ToolSet};
use crate::ports::update_logger::{NoUpdateLogger, UpdateLogger};
use futures::{FutureExt, StreamExt};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use toolrun_domain::{MessageUpdate, ToolCall, ToolCallId, ToolOutput, ToolResult};
use tracing::{debug, info, warn};

/// Executes tool calls for one turn.
///
/// Cheap to clone; every concurrently running call holds its own clone.
#[derive(Clone)]
pub struct ToolExecutor {
    tools: Arc<ToolSet>,
    metrics: Arc<dyn ToolMetrics>,
    config: Arc<RunToolsConfig>,
    logger: Arc<dyn UpdateLogger>,
}

impl ToolExecutor {
    pub fn new(
        tools: Arc<ToolSet>,
        metrics: Arc<dyn ToolMetrics>,
        config: Arc<RunToolsConfig>,
    ) -> Self {
        Self {
            tools,
            metrics,
            config,
            logger: Arc::new(NoUpdateLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn UpdateLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Run `call` to completion.
    ///
    /// Returns `None` for no-op tools, which emit nothing. A call naming a
    /// tool outside the active set fails without emitting anything. Emission
    /// failures are ignored; the result is produced either way.
    pub async fn execute(
        &self,
        call: ToolCall,
        context: Arc<ToolContext>,
        emitter: Emitter<MessageUpdate>,
    ) -> Option<ToolResult> {
        let id = ToolCallId::generate();

        let Some(tool) = self.tools.get(&call.name) else {
            warn!("Tool '{}' is not in the active tool set", call.name);
            let message = format!("Tool \"{}\" is not available", call.name);
            return Some(ToolResult::failure(call, message));
        };

        if tool.definition.is_no_op {
            debug!("Skipping no-op tool '{}'", call.name);
            return None;
        }

        self.metrics.record_tool_use(&call.name);
        let started = Instant::now();
        self.emit(
            &emitter,
            MessageUpdate::ToolCall {
                id: id.clone(),
                call: call.clone(),
            },
        )
        .await;

        let handler = Arc::clone(&tool.handler);
        let outcome = AssertUnwindSafe(self.drive(handler.as_ref(), &call, &context, &id, &emitter))
            .catch_unwind()
            .await;

        let detail = match outcome {
            Ok(Ok(output)) => {
                let elapsed = started.elapsed();
                info!("Tool '{}' completed in {:?}", call.name, elapsed);
                let result = ToolResult::success(call, output);
                self.emit(
                    &emitter,
                    MessageUpdate::ToolResult {
                        id,
                        result: result.clone(),
                    },
                )
                .await;
                self.metrics.observe_tool_duration(&result.call.name, elapsed);
                return Some(result);
            }
            Ok(Err(failure)) => failure.message,
            Err(panic) => format!("panicked: {}", panic_message(panic.as_ref())),
        };

        self.metrics.record_tool_error(&call.name);
        warn!("Tool '{}' failed: {}", call.name, detail);

        let message = self.config.error_message_for(&call.name);
        self.emit(
            &emitter,
            MessageUpdate::ToolError {
                id,
                message: message.clone(),
            },
        )
        .await;
        Some(ToolResult::failure(call, message))
    }

    /// Poll the handler until its first output, forwarding progress.
    async fn drive(
        &self,
        handler: &dyn ToolHandler,
        call: &ToolCall,
        context: &ToolContext,
        id: &ToolCallId,
        emitter: &Emitter<MessageUpdate>,
    ) -> Result<ToolOutput, ToolFailure> {
        let mut events = handler.call(call, context);

        while let Some(event) = events.next().await {
            match event? {
                ToolEvent::Progress(message) => {
                    let update = MessageUpdate::ToolProgress {
                        id: id.clone(),
                        message,
                    };
                    self.emit(emitter, update).await;
                }
                ToolEvent::Output(output) => return Ok(output),
            }
        }

        Err(ToolFailure::new("stream ended without an output"))
    }

    async fn emit(&self, emitter: &Emitter<MessageUpdate>, update: MessageUpdate) {
        self.logger.log(&update);
        emitter.emit(update).await;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::merge::MergedStream;
    use crate::ports::tool_handler::{Tool, ToolEventStream};
    use std::sync::Mutex;
    use std::time::Duration;
    use toolrun_domain::ToolDefinition;

    /// Handler backed by a closure, for scripting tools in tests.
    pub(crate) struct FnHandler<F>(pub F);

    impl<F> ToolHandler for FnHandler<F>
    where
        F: Fn(&ToolCall) -> ToolEventStream + Send + Sync,
    {
        fn call(&self, call: &ToolCall, _context: &ToolContext) -> ToolEventStream {
            (self.0)(call)
        }
    }

    pub(crate) fn scripted(
        name: &str,
        handler: impl Fn(&ToolCall) -> ToolEventStream + Send + Sync + 'static,
    ) -> Tool {
        Tool::new(
            ToolDefinition::new(name, format!("{} tool", name)).on_by_default(true),
            Arc::new(FnHandler(handler)),
        )
    }

    pub(crate) fn answer_directly() -> Tool {
        Tool::new(
            ToolDefinition::new("directly_answer", "Answer without tools")
                .no_op()
                .locked(true)
                .on_by_default(true),
            Arc::new(FnHandler(|_: &ToolCall| -> ToolEventStream {
                panic!("no-op tools are never called")
            })),
        )
    }

    #[derive(Default)]
    pub(crate) struct RecordingMetrics {
        pub events: Mutex<Vec<String>>,
    }

    impl ToolMetrics for RecordingMetrics {
        fn record_tool_use(&self, tool: &str) {
            self.events.lock().unwrap().push(format!("use:{}", tool));
        }
        fn record_tool_error(&self, tool: &str) {
            self.events.lock().unwrap().push(format!("error:{}", tool));
        }
        fn observe_tool_duration(&self, tool: &str, _duration: Duration) {
            self.events.lock().unwrap().push(format!("duration:{}", tool));
        }
        fn observe_time_to_choose_tools(&self, model: &str, _duration: Duration) {
            self.events.lock().unwrap().push(format!("choose:{}", model));
        }
    }

    fn tool_set() -> ToolSet {
        ToolSet::new()
            .register(scripted("echo", |call| {
                let query = call.get_string("query").unwrap_or_default().to_string();
                Box::pin(async_stream::stream! {
                    yield Ok::<_, ToolFailure>(ToolEvent::Progress("looking".to_string()));
                    yield Ok(ToolEvent::Output(ToolOutput::single(query)));
                })
            }))
            .register(scripted("flaky", |_| {
                Box::pin(async_stream::stream! {
                    yield Ok::<_, ToolFailure>(ToolEvent::Progress("halfway".to_string()));
                    yield Err(ToolFailure::new("connection reset by peer"));
                })
            }))
            .register(scripted("silent", |_| Box::pin(futures::stream::empty())))
            .register(scripted("explosive", |_| {
                Box::pin(async_stream::stream! {
                    yield Ok::<_, ToolFailure>(ToolEvent::Progress("arming".to_string()));
                    panic!("kaboom");
                })
            }))
            .register(answer_directly())
    }

    async fn run(
        call: ToolCall,
        metrics: Arc<RecordingMetrics>,
    ) -> (Vec<MessageUpdate>, Option<ToolResult>) {
        let executor = ToolExecutor::new(
            Arc::new(tool_set()),
            metrics,
            Arc::new(RunToolsConfig::default()),
        );
        let context = Arc::new(ToolContext::default());
        let sources = [move |emitter| async move { Some(executor.execute(call, context, emitter).await) }];

        let mut merged = MergedStream::merge(sources, 16);
        let mut updates = Vec::new();
        while let Some(update) = merged.next().await {
            updates.push(update);
        }
        let result = merged.results().await.into_iter().next().flatten();
        (updates, result)
    }

    #[tokio::test]
    async fn test_success_lifecycle() {
        let metrics = Arc::new(RecordingMetrics::default());
        let (updates, result) =
            run(ToolCall::new("echo").with_param("query", "rust"), metrics.clone()).await;

        assert_eq!(updates.len(), 3);
        assert!(matches!(updates[0], MessageUpdate::ToolCall { .. }));
        assert!(matches!(
            &updates[1],
            MessageUpdate::ToolProgress { message, .. } if message == "looking"
        ));
        assert!(matches!(updates[2], MessageUpdate::ToolResult { .. }));
        assert_eq!(updates[0].id(), updates[2].id());

        let result = result.unwrap();
        assert!(result.is_success());
        assert_eq!(result.outputs(), &[serde_json::json!("rust")]);
        assert_eq!(
            *metrics.events.lock().unwrap(),
            vec!["use:echo", "duration:echo"]
        );
    }

    #[tokio::test]
    async fn test_mid_stream_failure_becomes_generic_error() {
        let metrics = Arc::new(RecordingMetrics::default());
        let (updates, result) = run(ToolCall::new("flaky"), metrics.clone()).await;

        let errors: Vec<_> = updates
            .iter()
            .filter(|u| matches!(u, MessageUpdate::ToolError { .. }))
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(updates.len(), 3);
        assert_eq!(updates[0].id(), errors[0].id());

        let result = result.unwrap();
        assert!(!result.is_success());
        let message = result.message().unwrap();
        assert_eq!(message, "An error occurred while calling the tool \"flaky\"");
        assert!(!message.contains("connection reset"));
        assert_eq!(
            *metrics.events.lock().unwrap(),
            vec!["use:flaky", "error:flaky"]
        );
    }

    #[tokio::test]
    async fn test_stream_without_output_fails() {
        let (updates, result) =
            run(ToolCall::new("silent"), Arc::new(RecordingMetrics::default())).await;
        assert_eq!(updates.len(), 2);
        assert!(updates[1].is_terminal());
        assert!(!result.unwrap().is_success());
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let (updates, result) =
            run(ToolCall::new("explosive"), Arc::new(RecordingMetrics::default())).await;
        assert!(matches!(updates.last(), Some(MessageUpdate::ToolError { .. })));
        assert!(!result.unwrap().is_success());
    }

    #[tokio::test]
    async fn test_no_op_is_silent() {
        let metrics = Arc::new(RecordingMetrics::default());
        let (updates, result) = run(ToolCall::new("directly_answer"), metrics.clone()).await;
        assert!(updates.is_empty());
        assert!(result.is_none());
        assert!(metrics.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_tool_fails_without_updates() {
        let (updates, result) =
            run(ToolCall::new("calculator"), Arc::new(RecordingMetrics::default())).await;
        assert!(updates.is_empty());
        let result = result.unwrap();
        assert!(!result.is_success());
        assert!(result.message().unwrap().contains("calculator"));
    }

    #[tokio::test]
    async fn test_runs_to_completion_when_nobody_listens() {
        let executor = ToolExecutor::new(
            Arc::new(tool_set()),
            Arc::new(RecordingMetrics::default()),
            Arc::new(RunToolsConfig::default()),
        );
        let call = ToolCall::new("echo").with_param("query", "q");
        let sources = [move |emitter| async move {
            executor.execute(call, Arc::new(ToolContext::default()), emitter).await
        }];

        let merged = MergedStream::merge(sources, 1);
        let results = merged.results().await;
        assert_eq!(results.len(), 1);
        assert!(results[0].is_success());
    }

    #[tokio::test]
    async fn test_updates_logged_when_stream_is_unread() {
        #[derive(Default)]
        struct Capture(Mutex<Vec<&'static str>>);
        impl UpdateLogger for Capture {
            fn log(&self, update: &MessageUpdate) {
                self.0.lock().unwrap().push(update.kind());
            }
        }

        let logger = Arc::new(Capture::default());
        let executor = ToolExecutor::new(
            Arc::new(tool_set()),
            Arc::new(RecordingMetrics::default()),
            Arc::new(RunToolsConfig::default()),
        )
        .with_logger(logger.clone());
        let context = Arc::new(ToolContext::default());
        let sources = [move |emitter| async move {
            Some(executor.execute(ToolCall::new("flaky"), context, emitter).await)
        }];

        let results = MergedStream::merge(sources, 1).results().await;
        assert_eq!(results.len(), 1);
        assert_eq!(
            *logger.0.lock().unwrap(),
            vec!["tool_call", "tool_progress", "tool_error"]
        );
    }
}
