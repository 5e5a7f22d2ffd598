//! Port for structured update logging.
//!
//! Records every [`MessageUpdate`] of a turn to a machine-readable log
//! (e.g. JSONL). Separate from `tracing`: tracing carries diagnostics, this
//! port carries the transcript the caller saw.

use toolrun_domain::MessageUpdate;

/// Port for logging message updates.
///
/// `log` is synchronous and non-fallible so that logging can never disrupt
/// a turn; write failures are dropped by the implementation.
pub trait UpdateLogger: Send + Sync {
    fn log(&self, update: &MessageUpdate);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoUpdateLogger;

impl UpdateLogger for NoUpdateLogger {
    fn log(&self, _update: &MessageUpdate) {}
}
