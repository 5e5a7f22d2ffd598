//! Per-turn tool selection.
//!
//! Decides which configured tools are offered to the model for one turn,
//! based on user preferences and whether the conversation belongs to an
//! assistant.

use super::entities::{ToolDefinition, WEB_SEARCH};
use std::collections::HashMap;

/// Whether `tool` is active given the user's recorded preferences.
///
/// Locked tools that are on by default cannot be turned off. Otherwise an
/// explicit preference wins, falling back to the tool's own default.
pub fn is_tool_enabled(tool: &ToolDefinition, preferences: &HashMap<String, bool>) -> bool {
    if tool.is_locked && tool.is_on_by_default {
        return true;
    }
    preferences
        .get(&tool.name)
        .copied()
        .unwrap_or(tool.is_on_by_default)
}

/// Select the tools eligible for this turn, preserving registration order.
///
/// Assistants get a fixed, reduced surface: the no-op "answer directly"
/// tool followed by the web search tool, regardless of preferences.
pub fn select_tools<'a>(
    tools: impl IntoIterator<Item = &'a ToolDefinition>,
    preferences: &HashMap<String, bool>,
    is_assistant: bool,
) -> Vec<&'a ToolDefinition> {
    let tools: Vec<&ToolDefinition> = tools.into_iter().collect();

    if is_assistant {
        let no_op = tools.iter().copied().find(|t| t.is_no_op);
        let web_search = tools.iter().copied().find(|t| t.name == WEB_SEARCH);
        return no_op.into_iter().chain(web_search).collect();
    }

    tools
        .into_iter()
        .filter(|t| is_tool_enabled(t, preferences))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured() -> Vec<ToolDefinition> {
        vec![
            ToolDefinition::new("fetch_url", "Fetch a page").on_by_default(false),
            ToolDefinition::new("directly_answer", "Answer directly")
                .no_op()
                .locked(true)
                .on_by_default(true),
            ToolDefinition::new(WEB_SEARCH, "Search").on_by_default(true),
            ToolDefinition::new("file_content", "Read a file").on_by_default(true),
        ]
    }

    fn names(selected: &[&ToolDefinition]) -> Vec<String> {
        selected.iter().map(|t| t.name.clone()).collect()
    }

    #[test]
    fn test_assistant_gets_fixed_pair() {
        let tools = configured();
        let mut prefs = HashMap::new();
        prefs.insert("fetch_url".to_string(), true);
        prefs.insert(WEB_SEARCH.to_string(), false);

        let selected = select_tools(&tools, &prefs, true);
        assert_eq!(names(&selected), vec!["directly_answer", WEB_SEARCH]);

        let selected = select_tools(&tools, &HashMap::new(), true);
        assert_eq!(names(&selected), vec!["directly_answer", WEB_SEARCH]);
    }

    #[test]
    fn test_defaults_without_preferences() {
        let tools = configured();
        let selected = select_tools(&tools, &HashMap::new(), false);
        assert_eq!(
            names(&selected),
            vec!["directly_answer", WEB_SEARCH, "file_content"]
        );
    }

    #[test]
    fn test_preferences_override_defaults() {
        let tools = configured();
        let mut prefs = HashMap::new();
        prefs.insert("fetch_url".to_string(), true);
        prefs.insert(WEB_SEARCH.to_string(), false);

        let selected = select_tools(&tools, &prefs, false);
        assert_eq!(
            names(&selected),
            vec!["fetch_url", "directly_answer", "file_content"]
        );
    }

    #[test]
    fn test_locked_on_by_default_cannot_be_disabled() {
        let tools = configured();
        let mut prefs = HashMap::new();
        prefs.insert("directly_answer".to_string(), false);

        let selected = select_tools(&tools, &prefs, false);
        assert!(names(&selected).contains(&"directly_answer".to_string()));
    }

    #[test]
    fn test_locked_off_by_default_follows_preference() {
        let tool = ToolDefinition::new("beta", "Beta tool").locked(true);
        let mut prefs = HashMap::new();
        assert!(!is_tool_enabled(&tool, &prefs));
        prefs.insert("beta".to_string(), true);
        assert!(is_tool_enabled(&tool, &prefs));
    }
}
