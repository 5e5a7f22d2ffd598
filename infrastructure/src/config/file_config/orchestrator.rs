//! Orchestrator configuration from TOML (`[orchestrator]` section)
//!
//! ```toml
//! [orchestrator]
//! event_buffer = 64
//! generic_error_message = "The tool could not complete"
//! ```

use serde::{Deserialize, Serialize};
use toolrun_application::RunToolsConfig;
use toolrun_application::config::DEFAULT_EVENT_BUFFER;

/// Raw orchestrator configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOrchestratorConfig {
    /// Updates buffered between running tools and the caller
    pub event_buffer: usize,
    /// Message shown to the caller when a tool fails
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_error_message: Option<String>,
}

impl Default for FileOrchestratorConfig {
    fn default() -> Self {
        Self {
            event_buffer: DEFAULT_EVENT_BUFFER,
            generic_error_message: None,
        }
    }
}

impl FileOrchestratorConfig {
    pub fn to_run_tools_config(&self) -> RunToolsConfig {
        RunToolsConfig {
            event_buffer: self.event_buffer,
            generic_error_message: self.generic_error_message.clone(),
        }
    }
}
