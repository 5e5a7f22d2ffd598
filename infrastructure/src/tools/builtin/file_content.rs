//! `file_content` tool: read back a file attached to the conversation.
//!
//! Files are referred to by the `[file N]` index listed in the attached
//! files summary appended to each message.

use futures::stream;
use serde_json::json;
use toolrun_application::{ToolContext, ToolEvent, ToolEventStream, ToolFailure, ToolHandler};
use toolrun_domain::{ToolCall, ToolDefinition, ToolInput, ToolOutput, file_by_index};

/// Canonical tool name
pub const FILE_CONTENT: &str = "file_content";

pub fn file_content_definition() -> ToolDefinition {
    ToolDefinition::new(
        FILE_CONTENT,
        "Read the text content of a file attached to the conversation, by its [file N] index.",
    )
    .with_display_name("Read attached file")
    .with_alias("read_file")
    .with_input(
        ToolInput::required("file_index", "Index N of the file as listed in [file N]")
            .with_type("number"),
    )
    .on_by_default(true)
}

/// Handler for `file_content`
#[derive(Debug, Clone, Default)]
pub struct FileContent;

impl FileContent {
    fn read(call: &ToolCall, context: &ToolContext) -> Result<ToolOutput, ToolFailure> {
        let index = call
            .get_i64("file_index")
            .ok_or_else(|| ToolFailure::new("file_index must be a number"))?;
        let index = usize::try_from(index)
            .map_err(|_| ToolFailure::new(format!("Invalid file index: {}", index)))?;

        let file = file_by_index(&context.messages, index)
            .ok_or_else(|| ToolFailure::new(format!("No attached file with index {}", index)))?;
        let content = file.content.as_deref().ok_or_else(|| {
            ToolFailure::new(format!("File '{}' ({}) has no text content", file.name, file.mime))
        })?;

        Ok(ToolOutput::single(json!({
            "file_index": index,
            "name": file.name,
            "mime": file.mime,
            "content": content,
        })))
    }
}

impl ToolHandler for FileContent {
    fn call(&self, call: &ToolCall, context: &ToolContext) -> ToolEventStream {
        let result = Self::read(call, context).map(ToolEvent::Output);
        Box::pin(stream::iter([result]))
    }
}
