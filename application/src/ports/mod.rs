//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod endpoint;
pub mod metrics;
pub mod tool_handler;
pub mod update_logger;
