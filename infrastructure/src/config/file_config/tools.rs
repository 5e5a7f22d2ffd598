//! Tools configuration from TOML (`[tools]` section)
//!
//! Built-in tools can be switched off entirely or have their availability
//! flags changed per tool:
//!
//! ```toml
//! [tools]
//! web_timeout_seconds = 30
//!
//! [tools.overrides.fetch_url]
//! enabled = true
//! on_by_default = true
//!
//! [tools.overrides.websearch]
//! locked = true
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use toolrun_domain::ToolDefinition;

/// Default timeout for HTTP requests made by web tools
pub const DEFAULT_WEB_TIMEOUT_SECONDS: u64 = 30;

/// Per-tool override. Unset fields keep the tool's built-in value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolOverride {
    /// Whether the tool is registered at all
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    /// Whether user preferences are ignored
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// Whether the tool is active without a recorded preference
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_by_default: Option<bool>,
}

impl FileToolOverride {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    /// Apply the overridden flags to `definition`.
    pub fn apply(&self, definition: ToolDefinition) -> ToolDefinition {
        let mut definition = definition;
        if let Some(locked) = self.locked {
            definition = definition.locked(locked);
        }
        if let Some(on) = self.on_by_default {
            definition = definition.on_by_default(on);
        }
        definition
    }
}

/// Raw tools configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileToolsConfig {
    /// Timeout for web tool HTTP requests, in seconds
    pub web_timeout_seconds: u64,
    /// Overrides keyed by canonical tool name
    pub overrides: BTreeMap<String, FileToolOverride>,
}

impl Default for FileToolsConfig {
    fn default() -> Self {
        Self {
            web_timeout_seconds: DEFAULT_WEB_TIMEOUT_SECONDS,
            overrides: BTreeMap::new(),
        }
    }
}

impl FileToolsConfig {
    pub fn override_for(&self, tool: &str) -> Option<&FileToolOverride> {
        self.overrides.get(tool)
    }

    /// Override names that match none of `known`.
    pub fn unknown_overrides<'a>(&'a self, known: &[&str]) -> Vec<&'a str> {
        self.overrides
            .keys()
            .map(String::as_str)
            .filter(|name| !known.contains(name))
            .collect()
    }
}
