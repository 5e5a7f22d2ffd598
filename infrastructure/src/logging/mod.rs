//! Logging infrastructure: structured update logging.
//!
//! Provides [`JsonlUpdateLogger`], a JSONL file writer that implements
//! the [`UpdateLogger`](toolrun_application::UpdateLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlUpdateLogger;
