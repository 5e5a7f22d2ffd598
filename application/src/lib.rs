//! Application layer for toolrun
//!
//! This crate contains the tool turn use case, its port definitions and the
//! stream merger it runs tools on. It depends only on the domain layer.

pub mod config;
pub mod merge;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::RunToolsConfig;
pub use merge::{Emitter, MergedStream};
pub use ports::{
    endpoint::{Endpoint, EndpointError, EndpointRequest, EndpointStream},
    metrics::{NoMetrics, ToolMetrics},
    tool_handler::{
        Tool, ToolContext, ToolEvent, ToolEventStream, ToolFailure, ToolHandler, ToolSet,
    },
    update_logger::{NoUpdateLogger, UpdateLogger},
};
pub use use_cases::execute_tool::ToolExecutor;
pub use use_cases::extract_calls::{Extraction, extract_calls};
pub use use_cases::run_tools::{
    RunToolsError, RunToolsInput, RunToolsOutput, RunToolsUseCase, ToolTurn,
};
