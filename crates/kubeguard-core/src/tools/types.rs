//! Tool-related type definitions

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A tool call received from the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier of the request carrying this call
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    /// Raw arguments, exactly as sent by the caller
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Build a call from a JSON object; non-object values yield no arguments
    pub fn from_json(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map.into_iter().collect(),
            _ => HashMap::new(),
        };
        Self::new(id, name, arguments)
    }

    /// Get an argument, treating JSON `null` as absent
    pub fn argument(&self, key: &str) -> Option<&serde_json::Value> {
        self.arguments.get(key).filter(|value| !value.is_null())
    }

    /// Get a string argument; `None` when missing or not a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.argument(key).and_then(serde_json::Value::as_str)
    }

    /// Get a string argument as an owned value
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_str(key).map(str::to_string)
    }
}

/// Advisory side-effect label attached to a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModifiesResource {
    /// The command changes cluster state
    Yes,
    /// The command does not change cluster state
    No,
    /// Unknown or not classifiable
    #[default]
    Unknown,
}

impl ModifiesResource {
    /// All labels, in schema order
    pub const ALL: [ModifiesResource; 3] = [Self::Yes, Self::No, Self::Unknown];

    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "yes",
            Self::No => "no",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ModifiesResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModifiesResource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Self::Yes),
            "no" => Ok(Self::No),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("invalid modifies_resource value: {}", other)),
        }
    }
}

/// Outcome of one tool execution attempt
///
/// Always returned, never thrown. `error` is non-empty exactly when the call
/// was rejected before execution, the child failed to spawn, or the child
/// exited non-zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecResult {
    /// Command as actually invoked (including interpreter arguments)
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub command: String,
    /// Error description, empty on success
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
    /// Captured output; stdout and stderr combined in arrival order
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stdout: String,
    /// Reserved for callers that keep stderr separate
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stderr: String,
    /// Exit code; 0 when absent or on success
    #[serde(default, skip_serializing_if = "is_zero")]
    pub exit_code: i32,
    /// Optional stream-type tag
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub stream_type: String,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

impl ExecResult {
    /// Result carrying only an error, for calls rejected before execution
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            ..Self::default()
        }
    }

    /// Attach the command string
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Whether this result carries an error
    pub fn is_error(&self) -> bool {
        !self.error.is_empty()
    }
}

impl fmt::Display for ExecResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Command: {:?}\nError: {:?}\nStdout: {:?}\nStderr: {:?}\nExitCode: {}\nStreamType: {:?}",
            self.command, self.error, self.stdout, self.stderr, self.exit_code, self.stream_type
        )
    }
}

/// Parameter definition for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Parameter type (string, number, boolean, object, array)
    pub param_type: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Enum values (if applicable)
    pub enum_values: Option<Vec<serde_json::Value>>,
}

impl ToolParameter {
    /// Create a required string parameter
    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type: "string".to_string(),
            required: true,
            enum_values: None,
        }
    }

    /// Create an optional string parameter
    pub fn optional_string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::string(name, description).optional()
    }

    /// Make parameter optional
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Restrict the parameter to a fixed set of values
    pub fn with_enum<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// JSON schema for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Tool name
    pub name: String,
    /// Tool description
    pub description: String,
    /// Input parameters schema
    pub parameters: serde_json::Value,
}

impl ToolSchema {
    /// Create a new tool schema
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ToolParameter>,
    ) -> Self {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in parameters {
            if param.required {
                required.push(param.name.clone());
            }

            let mut param_schema = serde_json::Map::new();
            param_schema.insert("type".to_string(), param.param_type.into());
            param_schema.insert("description".to_string(), param.description.into());

            if let Some(enum_values) = param.enum_values {
                param_schema.insert("enum".to_string(), enum_values.into());
            }

            properties.insert(param.name, param_schema.into());
        }

        let parameters_schema = serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required
        });

        Self {
            name: name.into(),
            description: description.into(),
            parameters: parameters_schema,
        }
    }
}
