//! Tool Registry
//!
//! The [`ToolRegistry`] assembles the configured [`ToolSet`] from the
//! built-in tools and the `[tools]` configuration section.
//!
//! # Usage
//!
//! ```ignore
//! use toolrun_infrastructure::{ConfigLoader, ToolRegistry};
//!
//! let config = ConfigLoader::load(None)?;
//! let tools = ToolRegistry::builtin(&config.tools).build();
//! assert!(tools.get("directly_answer").is_some());
//! ```
//!
//! # Overrides
//!
//! Each `[tools.overrides.<name>]` entry may remove a tool (`enabled =
//! false`) or change its `locked` / `on_by_default` flags. Override names
//! that match no registered tool are reported as warnings and otherwise
//! ignored.

use crate::config::FileToolsConfig;
use std::sync::Arc;
use toolrun_application::{Tool, ToolSet};
use tracing::{debug, warn};

use super::builtin::{
    DirectlyAnswer, FileContent, directly_answer_definition, file_content_definition,
};

/// Builder of the configured tool set
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    /// Registered tools, in registration order
    tools: Vec<Tool>,
    /// Overrides applied by `build()`
    config: FileToolsConfig,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in tool available in this build.
    ///
    /// Web tools are included when the `web-tools` feature is enabled.
    pub fn builtin(config: &FileToolsConfig) -> Self {
        let registry = Self::new()
            .with_config(config.clone())
            .register(Tool::new(
                directly_answer_definition(),
                Arc::new(DirectlyAnswer),
            ))
            .register(Tool::new(file_content_definition(), Arc::new(FileContent)));

        #[cfg(feature = "web-tools")]
        let registry = {
            use super::web::{
                FetchUrl, WebSearch, fetch_url_definition, http_client, web_search_definition,
            };
            let client = http_client(std::time::Duration::from_secs(config.web_timeout_seconds));
            registry
                .register(Tool::new(
                    web_search_definition(),
                    Arc::new(WebSearch::new(client.clone())),
                ))
                .register(Tool::new(fetch_url_definition(), Arc::new(FetchUrl::new(client))))
        };

        registry
    }

    /// Register a tool; a tool with the same name replaces the earlier one.
    pub fn register(mut self, tool: Tool) -> Self {
        match self.tools.iter_mut().find(|t| t.name() == tool.name()) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
        self
    }

    pub fn with_config(mut self, config: FileToolsConfig) -> Self {
        self.config = config;
        self
    }

    /// Apply overrides and produce the tool set.
    pub fn build(self) -> ToolSet {
        let known: Vec<&str> = self.tools.iter().map(|t| t.name()).collect();
        for name in self.config.unknown_overrides(&known) {
            warn!("Override for unknown tool '{}' ignored", name);
        }

        let mut set = ToolSet::new();
        for mut tool in self.tools {
            match self.config.override_for(tool.name()) {
                Some(over) if !over.is_enabled() => {
                    debug!(tool = tool.name(), "Tool disabled by configuration");
                    continue;
                }
                Some(over) => {
                    tool.definition = over.apply(tool.definition);
                }
                None => {}
            }
            debug!(
                tool = tool.name(),
                locked = tool.definition.is_locked,
                on_by_default = tool.definition.is_on_by_default,
                "Registered tool"
            );
            set = set.register(tool);
        }
        set
    }

    /// Get statistics about registered tools
    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            total_tools: self.tools.len(),
            locked: self.tools.iter().filter(|t| t.definition.is_locked).count(),
            on_by_default: self
                .tools
                .iter()
                .filter(|t| t.definition.is_on_by_default)
                .count(),
        }
    }
}

/// Statistics about the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_tools: usize,
    pub locked: usize,
    pub on_by_default: usize,
}
