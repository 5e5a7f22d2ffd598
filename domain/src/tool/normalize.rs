//! Call normalization
//!
//! Maps an untrusted [`ExternalToolCall`] onto a registered tool's declared
//! inputs. This is pure domain logic; the application layer decides what to
//! log and how to drop rejected calls.

use super::entities::{ExternalToolCall, ToolCall, ToolSpec};
use std::collections::HashMap;
use thiserror::Error;

/// Why an external call could not be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("Unknown tool '{0}'")]
    UnknownTool(String),

    #[error("Missing required parameter '{parameter}' for tool '{tool}'")]
    MissingParameter { tool: String, parameter: String },
}

/// Normalizer for external tool calls
pub trait CallNormalizer {
    /// Resolve the tool and build a complete [`ToolCall`] from the external
    /// parameters.
    fn normalize(
        &self,
        external: &ExternalToolCall,
        tools: &ToolSpec,
    ) -> Result<ToolCall, NormalizeError>;
}

/// Default implementation of CallNormalizer
///
/// Inputs are processed in declaration order: required inputs must be
/// present, present values are copied verbatim, absent optional inputs take
/// their declared default. Parameters the tool does not declare are ignored.
#[derive(Debug, Clone, Default)]
pub struct DefaultCallNormalizer;

impl CallNormalizer for DefaultCallNormalizer {
    fn normalize(
        &self,
        external: &ExternalToolCall,
        tools: &ToolSpec,
    ) -> Result<ToolCall, NormalizeError> {
        let definition = tools
            .resolve(&external.tool_name)
            .ok_or_else(|| NormalizeError::UnknownTool(external.tool_name.clone()))?;

        let mut parameters = HashMap::with_capacity(definition.inputs.len());
        for input in &definition.inputs {
            match external.parameters.get(&input.name) {
                Some(value) => {
                    parameters.insert(input.name.clone(), value.clone());
                }
                None if input.required => {
                    return Err(NormalizeError::MissingParameter {
                        tool: definition.name.clone(),
                        parameter: input.name.clone(),
                    });
                }
                None => {
                    if let Some(default) = &input.default {
                        parameters.insert(input.name.clone(), default.clone());
                    }
                }
            }
        }

        Ok(ToolCall {
            name: definition.name.clone(),
            parameters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ToolDefinition, ToolInput};
    use serde_json::json;

    fn spec() -> ToolSpec {
        ToolSpec::new().register(
            ToolDefinition::new("web_search", "Search the web")
                .with_alias("websearch")
                .with_input(ToolInput::required("query", "The query"))
                .with_input(ToolInput::optional("limit", "Result count", 5).with_type("number")),
        )
    }

    #[test]
    fn test_unknown_tool_rejected() {
        let external = ExternalToolCall::new("calculator").with_param("expr", "1+1");
        let result = DefaultCallNormalizer.normalize(&external, &spec());
        assert_eq!(
            result.unwrap_err(),
            NormalizeError::UnknownTool("calculator".to_string())
        );
    }

    #[test]
    fn test_missing_required_rejected() {
        let external = ExternalToolCall::new("web_search").with_param("limit", 2);
        let err = DefaultCallNormalizer.normalize(&external, &spec()).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::MissingParameter { ref parameter, .. } if parameter == "query"
        ));
        assert!(err.to_string().contains("Missing required parameter"));
    }

    #[test]
    fn test_optional_default_filled() {
        let external = ExternalToolCall::new("web_search").with_param("query", "rust");
        let call = DefaultCallNormalizer.normalize(&external, &spec()).unwrap();
        assert_eq!(call.parameters.get("limit"), Some(&json!(5)));
        assert_eq!(call.parameters.get("query"), Some(&json!("rust")));
    }

    #[test]
    fn test_present_value_copied_verbatim() {
        let external = ExternalToolCall::new("web_search")
            .with_param("query", "rust")
            .with_param("limit", "ten");
        let call = DefaultCallNormalizer.normalize(&external, &spec()).unwrap();
        assert_eq!(call.parameters.get("limit"), Some(&json!("ten")));
    }

    #[test]
    fn test_extra_parameters_ignored() {
        let external = ExternalToolCall::new("web_search")
            .with_param("query", "rust")
            .with_param("language", "en");
        let call = DefaultCallNormalizer.normalize(&external, &spec()).unwrap();
        assert!(!call.parameters.contains_key("language"));
        assert_eq!(call.parameters.len(), 2);
    }

    #[test]
    fn test_alias_and_separator_resolve_to_canonical_name() {
        for name in ["websearch", "web-search"] {
            let external = ExternalToolCall::new(name).with_param("query", "x");
            let call = DefaultCallNormalizer.normalize(&external, &spec()).unwrap();
            assert_eq!(call.name, "web_search");
        }
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let external = ExternalToolCall::new("websearch").with_param("query", "x");
        let first = DefaultCallNormalizer.normalize(&external, &spec()).unwrap();
        let second = DefaultCallNormalizer.normalize(&external, &spec()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_required_input_ignores_default() {
        let mut input = ToolInput::required("query", "The query");
        input.default = Some(json!("fallback"));
        let spec = ToolSpec::new().register(ToolDefinition::new("search", "s").with_input(input));

        let result = DefaultCallNormalizer.normalize(&ExternalToolCall::new("search"), &spec);
        assert!(result.is_err());
    }
}
