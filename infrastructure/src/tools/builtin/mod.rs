//! Built-in tools
//!
//! Always available, no network access:
//! - `directly_answer`: no-op tool meaning "answer without tools"
//! - `file_content`: read an attached file by index

mod answer;
mod file_content;

pub use answer::{DIRECTLY_ANSWER, DirectlyAnswer, directly_answer_definition};
pub use file_content::{FILE_CONTENT, FileContent, file_content_definition};
