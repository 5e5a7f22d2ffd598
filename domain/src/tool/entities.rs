//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Canonical name of the web search tool (always offered to assistants).
pub const WEB_SEARCH: &str = "websearch";

/// Declared input of a tool.
///
/// `default` is only consulted when the input is optional and absent from
/// the model's call; it is ignored for required inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInput {
    /// Input name as it appears in the parameter map
    pub name: String,
    /// Human-readable description (shown to the model)
    pub description: String,
    /// Whether the model must supply this input
    pub required: bool,
    /// Value substituted when an optional input is omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Type hint (e.g., "string", "number")
    pub input_type: String,
}

impl ToolInput {
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: true,
            default: None,
            input_type: "string".to_string(),
        }
    }

    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        default: impl Into<serde_json::Value>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required: false,
            default: Some(default.into()),
            input_type: "string".to_string(),
        }
    }

    pub fn with_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = input_type.into();
        self
    }
}

/// Descriptor of a tool that can be offered to the model.
///
/// The executable side of a tool lives in the application layer; this type
/// only carries what the orchestration logic reasons about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "websearch")
    pub name: String,
    /// Alternative names the model may use
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Name shown in user interfaces
    pub display_name: String,
    /// Human-readable description
    pub description: String,
    /// Declared inputs, in declaration order
    pub inputs: Vec<ToolInput>,
    /// Locked tools ignore user preferences
    #[serde(default)]
    pub is_locked: bool,
    /// Whether the tool is active when no preference is recorded
    #[serde(default)]
    pub is_on_by_default: bool,
    /// Calls to a no-op tool mean "answer directly" and are never executed
    #[serde(default)]
    pub is_no_op: bool,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            aliases: Vec::new(),
            description: description.into(),
            inputs: Vec::new(),
            is_locked: false,
            is_on_by_default: false,
            is_no_op: false,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_input(mut self, input: ToolInput) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn locked(mut self, locked: bool) -> Self {
        self.is_locked = locked;
        self
    }

    pub fn on_by_default(mut self, on: bool) -> Self {
        self.is_on_by_default = on;
        self
    }

    pub fn no_op(mut self) -> Self {
        self.is_no_op = true;
        self
    }

    /// Whether `name` refers to this tool.
    ///
    /// Matches the canonical name or an alias, tolerating `-` written in
    /// place of `_` (and vice versa).
    pub fn has_name(&self, name: &str) -> bool {
        let wanted = canonical_form(name);
        canonical_form(&self.name) == wanted
            || self.aliases.iter().any(|a| canonical_form(a) == wanted)
    }

    pub fn input(&self, name: &str) -> Option<&ToolInput> {
        self.inputs.iter().find(|i| i.name == name)
    }
}

fn canonical_form(name: &str) -> String {
    name.trim().replace('-', "_")
}

/// Ordered set of available tool definitions.
///
/// Registration order is preserved; it is the order tools are offered to
/// the model and the order selection returns them in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolSpec {
    tools: Vec<ToolDefinition>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Register a tool; a tool with the same name replaces the earlier one
    /// in place.
    pub fn register(mut self, tool: ToolDefinition) -> Self {
        match self.tools.iter_mut().find(|t| t.name == tool.name) {
            Some(existing) => *existing = tool,
            None => self.tools.push(tool),
        }
        self
    }

    /// Get a tool by its exact canonical name.
    pub fn get(&self, name: &str) -> Option<&ToolDefinition> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Resolve any name the model may have used (canonical, alias, or a
    /// separator variant of either).
    pub fn resolve(&self, name: &str) -> Option<&ToolDefinition> {
        self.get(name)
            .or_else(|| self.tools.iter().find(|t| t.has_name(name)))
    }

    pub fn all(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tools.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl FromIterator<ToolDefinition> for ToolSpec {
    fn from_iter<I: IntoIterator<Item = ToolDefinition>>(iter: I) -> Self {
        iter.into_iter().fold(ToolSpec::new(), ToolSpec::register)
    }
}

/// Untrusted tool call as produced by the model.
///
/// Nothing about required inputs or defaults has been checked yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalToolCall {
    /// Name the model used for the tool
    pub tool_name: String,
    /// Free-form parameters
    #[serde(default)]
    pub parameters: HashMap<String, serde_json::Value>,
}

impl ExternalToolCall {
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            parameters: HashMap::new(),
        }
    }

    pub fn with_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Build from an arbitrary JSON value if it has the expected shape:
    /// an object with a string `tool_name` and an object `parameters`.
    ///
    /// Anything else yields `None`.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;
        let tool_name = object.get("tool_name")?.as_str()?;
        let parameters = object.get("parameters")?.as_object()?;
        Some(Self {
            tool_name: tool_name.to_string(),
            parameters: parameters
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        })
    }
}

/// A resolved, normalized tool call.
///
/// `name` is the canonical tool name, every required input is present and
/// every optional input with a default has been filled in. Calls annotated
/// natively by the endpoint are trusted to already be in this form (see the
/// `From<ExternalToolCall>` impl).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Canonical name of the tool to call
    pub name: String,
    /// Concrete parameter values
    pub parameters: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: HashMap::new(),
        }
    }

    pub fn with_param(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }

    /// Get a string parameter
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string parameter or return an error message
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }

    /// Get an i64 parameter; numeric strings are accepted as well
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        let value = self.parameters.get(key)?;
        value
            .as_i64()
            .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
    }
}

impl From<ExternalToolCall> for ToolCall {
    /// Take a call as is: no name resolution, no defaults.
    fn from(external: ExternalToolCall) -> Self {
        Self {
            name: external.tool_name,
            parameters: external.parameters,
        }
    }
}
