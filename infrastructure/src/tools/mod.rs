//! Tool implementations
//!
//! - `builtin`: tools that are always available (`directly_answer`,
//!   `file_content`)
//! - `web`: network tools (`websearch`, `fetch_url`), behind the
//!   `web-tools` feature
//!
//! [`ToolRegistry`] turns them into the configured
//! [`ToolSet`](toolrun_application::ToolSet).

pub mod builtin;
#[cfg(feature = "web-tools")]
pub mod web;

mod registry;

pub use registry::{RegistryStats, ToolRegistry};
