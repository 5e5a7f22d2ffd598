//! Conversation session domain.
//!
//! - [`entities::Message`]: a single message with its attached files
//! - [`stream::EndpointOutput`]: items streamed by a generation endpoint
//! - [`update::MessageUpdate`]: updates streamed to the caller during a turn

pub mod entities;
pub mod stream;
pub mod update;
