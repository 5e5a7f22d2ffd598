//! Infrastructure layer for toolrun
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: built-in tools and their registry, the replay
//! endpoint, metrics, update logging and configuration file loading.

pub mod config;
pub mod endpoint;
pub mod logging;
pub mod metrics;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLoggingConfig, FileOrchestratorConfig,
    FileToolOverride, FileToolsConfig,
};
pub use endpoint::{REPLAY_MODEL, ReplayEndpoint, ReplayError};
pub use logging::JsonlUpdateLogger;
pub use metrics::{DurationSummary, InMemoryToolMetrics, MetricsSnapshot};
pub use tools::{RegistryStats, ToolRegistry};
