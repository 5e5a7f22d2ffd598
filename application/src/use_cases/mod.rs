//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod execute_tool;
pub mod extract_calls;
pub mod run_tools;
