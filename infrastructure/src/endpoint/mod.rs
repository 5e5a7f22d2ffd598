//! Endpoint adapters.
//!
//! Implementations of the [`Endpoint`](toolrun_application::Endpoint) port.

mod replay;

pub use replay::{REPLAY_MODEL, ReplayEndpoint, ReplayError};
