//! In-memory tool metrics.
//!
//! Implements the [`ToolMetrics`] port with per-label counters and duration
//! summaries. A [`MetricsSnapshot`] can be taken at any point, e.g. by the
//! CLI at the end of a turn.
//!
//! Durations are kept as summaries (count, total, max), not histograms:
//! there are no buckets, so percentiles cannot be derived from a snapshot.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;
use toolrun_application::ToolMetrics;

/// Summary of observed durations for one label.
///
/// Only count, total and maximum are tracked; no bucket distribution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct DurationSummary {
    pub count: u64,
    pub total_ms: u64,
    pub max_ms: u64,
}

impl DurationSummary {
    fn observe(&mut self, duration: Duration) {
        let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        self.count += 1;
        self.total_ms = self.total_ms.saturating_add(ms);
        self.max_ms = self.max_ms.max(ms);
    }

    /// Mean duration in milliseconds, `None` when nothing was observed
    pub fn mean_ms(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total_ms as f64 / self.count as f64)
    }
}

/// Point-in-time copy of all recorded metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    /// `tool_use_count` by tool name
    pub tool_use_count: BTreeMap<String, u64>,
    /// `tool_use_count_error` by tool name
    pub tool_use_count_error: BTreeMap<String, u64>,
    /// `tool_use_duration` summary by tool name
    pub tool_use_duration: BTreeMap<String, DurationSummary>,
    /// `time_to_choose_tools` summary by model
    pub time_to_choose_tools: BTreeMap<String, DurationSummary>,
}

impl MetricsSnapshot {
    pub fn uses(&self, tool: &str) -> u64 {
        self.tool_use_count.get(tool).copied().unwrap_or(0)
    }

    pub fn errors(&self, tool: &str) -> u64 {
        self.tool_use_count_error.get(tool).copied().unwrap_or(0)
    }
}

/// Thread-safe in-memory [`ToolMetrics`] implementation.
#[derive(Debug, Default)]
pub struct InMemoryToolMetrics {
    inner: Mutex<MetricsSnapshot>,
}

impl InMemoryToolMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        match self.inner.lock() {
            Ok(inner) => inner.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn update(&self, f: impl FnOnce(&mut MetricsSnapshot)) {
        let mut inner = match self.inner.lock() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        f(&mut inner);
    }
}

impl ToolMetrics for InMemoryToolMetrics {
    fn record_tool_use(&self, tool: &str) {
        self.update(|m| *m.tool_use_count.entry(tool.to_string()).or_default() += 1);
    }

    fn record_tool_error(&self, tool: &str) {
        self.update(|m| *m.tool_use_count_error.entry(tool.to_string()).or_default() += 1);
    }

    fn observe_tool_duration(&self, tool: &str, duration: Duration) {
        self.update(|m| {
            m.tool_use_duration
                .entry(tool.to_string())
                .or_default()
                .observe(duration)
        });
    }

    fn observe_time_to_choose_tools(&self, model: &str, duration: Duration) {
        self.update(|m| {
            m.time_to_choose_tools
                .entry(model.to_string())
                .or_default()
                .observe(duration)
        });
    }
}
