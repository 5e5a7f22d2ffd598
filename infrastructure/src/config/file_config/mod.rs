//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! where needed.

mod logging;
mod orchestrator;
mod tools;

pub use logging::FileLoggingConfig;
pub use orchestrator::FileOrchestratorConfig;
pub use tools::{DEFAULT_WEB_TIMEOUT_SECONDS, FileToolOverride, FileToolsConfig};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("orchestrator.event_buffer cannot be 0")]
    ZeroEventBuffer,

    #[error("tools.web_timeout_seconds cannot be 0")]
    ZeroWebTimeout,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Turn orchestration settings
    pub orchestrator: FileOrchestratorConfig,
    /// Built-in tool settings
    pub tools: FileToolsConfig,
    /// Update log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.orchestrator.event_buffer == 0 {
            return Err(ConfigValidationError::ZeroEventBuffer);
        }
        if self.tools.web_timeout_seconds == 0 {
            return Err(ConfigValidationError::ZeroWebTimeout);
        }
        Ok(())
    }

    pub fn web_timeout(&self) -> Duration {
        Duration::from_secs(self.tools.web_timeout_seconds)
    }
}
