//! Configuration file loading for toolrun
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `TOOLRUN_` environment variables
//! 2. `--config <path>` specified file
//! 3. Project root: `./toolrun.toml` or `./.toolrun.toml`
//! 4. Global: `~/.config/toolrun/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_WEB_TIMEOUT_SECONDS, FileConfig, FileLoggingConfig,
    FileOrchestratorConfig, FileToolOverride, FileToolsConfig,
};
pub use loader::ConfigLoader;
