//! Session domain entities

use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A file attached to a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageFile {
    pub name: String,
    pub mime: String,
    /// Text content, when the file is readable as text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl MessageFile {
    pub fn new(name: impl Into<String>, mime: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            content: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<MessageFile>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role(Role::Assistant, content)
    }

    fn with_role(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            files: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: MessageFile) -> Self {
        self.files.push(file);
        self
    }
}

/// Attached files of a conversation paired with their 1-based index.
///
/// Indices run across the whole conversation: message order first, then
/// file order within a message.
pub fn indexed_files(messages: &[Message]) -> impl Iterator<Item = (usize, &MessageFile)> {
    messages
        .iter()
        .flat_map(|m| m.files.iter())
        .enumerate()
        .map(|(i, f)| (i + 1, f))
}

/// Look up an attached file by its conversation-wide 1-based index.
pub fn file_by_index(messages: &[Message], index: usize) -> Option<&MessageFile> {
    indexed_files(messages).find(|(i, _)| *i == index).map(|(_, f)| f)
}

/// Append a summary of attached files to every message that has any.
///
/// Each file is listed as `- [file N] name (mime)` so the model can refer
/// to it by index.
pub fn annotate_files_summary(messages: &[Message]) -> Vec<Message> {
    let mut next_index = 1;
    messages
        .iter()
        .map(|message| {
            let mut annotated = message.clone();
            if !message.files.is_empty() {
                annotated.content.push_str("\n\nAttached files:");
                for file in &message.files {
                    annotated.content.push_str(&format!(
                        "\n- [file {}] {} ({})",
                        next_index, file.name, file.mime
                    ));
                    next_index += 1;
                }
            }
            annotated
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Vec<Message> {
        vec![
            Message::system("be helpful"),
            Message::user("look at these")
                .with_file(MessageFile::new("a.txt", "text/plain").with_content("alpha"))
                .with_file(MessageFile::new("b.png", "image/png")),
            Message::assistant("ok"),
            Message::user("and this")
                .with_file(MessageFile::new("c.md", "text/markdown").with_content("gamma")),
        ]
    }

    #[test]
    fn test_annotate_files_summary() {
        let annotated = annotate_files_summary(&conversation());

        assert_eq!(annotated[0].content, "be helpful");
        assert_eq!(
            annotated[1].content,
            "look at these\n\nAttached files:\n- [file 1] a.txt (text/plain)\n- [file 2] b.png (image/png)"
        );
        assert_eq!(annotated[2].content, "ok");
        assert_eq!(
            annotated[3].content,
            "and this\n\nAttached files:\n- [file 3] c.md (text/markdown)"
        );
    }

    #[test]
    fn test_annotate_keeps_files() {
        let annotated = annotate_files_summary(&conversation());
        assert_eq!(annotated[1].files.len(), 2);
    }

    #[test]
    fn test_file_by_index() {
        let messages = conversation();
        assert_eq!(file_by_index(&messages, 1).unwrap().name, "a.txt");
        assert_eq!(file_by_index(&messages, 3).unwrap().name, "c.md");
        assert!(file_by_index(&messages, 0).is_none());
        assert!(file_by_index(&messages, 4).is_none());
    }

    #[test]
    fn test_message_serde_role_lowercase() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json.get("files").is_none());
    }
}
