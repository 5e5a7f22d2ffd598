//! Tool metrics port
//!
//! Counters and timings recorded while a turn runs. Injected as a trait
//! object so the engine never touches global state.

use std::time::Duration;

/// Sink for tool usage metrics.
///
/// All methods are synchronous and infallible; implementations must be
/// cheap enough to call from concurrently running tools.
pub trait ToolMetrics: Send + Sync {
    /// One call of `tool` started (`tool_use_count`)
    fn record_tool_use(&self, tool: &str);

    /// One call of `tool` failed (`tool_use_count_error`)
    fn record_tool_error(&self, tool: &str);

    /// Wall time of a successful call of `tool` (`tool_use_duration`)
    fn observe_tool_duration(&self, tool: &str, duration: Duration);

    /// Time `model` took to choose this turn's calls (`time_to_choose_tools`)
    fn observe_time_to_choose_tools(&self, model: &str, duration: Duration);
}

/// No-op metrics for tests and when metrics are disabled
pub struct NoMetrics;

impl ToolMetrics for NoMetrics {
    fn record_tool_use(&self, _tool: &str) {}
    fn record_tool_error(&self, _tool: &str) {}
    fn observe_tool_duration(&self, _tool: &str, _duration: Duration) {}
    fn observe_time_to_choose_tools(&self, _model: &str, _duration: Duration) {}
}
