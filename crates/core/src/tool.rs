//! Tool trait — the abstraction over agent capabilities.
//!
//! Tools are what give the agent the ability to act: evaluate arithmetic,
//! read the clock, convert currencies, look facts up. The model asks for
//! them by name through the textual action grammar; the [`ToolRegistry`]
//! resolves the name and turns every outcome into observation text.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{RegistryError, ToolError};

/// Arguments passed to a tool: a flat key → value object.
pub type Arguments = serde_json::Map<String, serde_json::Value>;

/// Key used when the model passes a bare scalar instead of an object.
pub const INPUT_KEY: &str = "input";

/// One declared parameter of a tool, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name as the model must spell it
    pub name: String,

    /// Free-form type hint shown in the catalog (e.g. "string - the query")
    pub hint: String,
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, hint: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hint: hint.into(),
        }
    }
}

/// The core Tool trait.
///
/// Each tool (calculator, get_current_time, convert_currency, ...) implements
/// this trait. Tools are registered once in a [`ToolRegistry`] and shared
/// read-only by every agent run.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique, case-sensitive name of this tool (e.g., "calculator").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// Declared parameters, in the order they are shown to the model.
    fn parameters(&self) -> Vec<ToolParameter>;

    /// Execute the tool with the given arguments.
    async fn execute(&self, arguments: &Arguments) -> std::result::Result<String, ToolError>;

    /// One catalog line: `name(param: hint, ...): description`.
    fn signature(&self) -> String {
        let params = self
            .parameters()
            .iter()
            .map(|p| format!("{}: {}", p.name, p.hint))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}({}): {}", self.name(), params, self.description())
    }
}

/// Read a string argument. Scalars other than strings are rendered as text.
pub fn string_arg(arguments: &Arguments, key: &str) -> std::result::Result<String, ToolError> {
    match arguments.get(key) {
        Some(serde_json::Value::String(s)) => Ok(s.clone()),
        Some(serde_json::Value::Null) | None => Err(ToolError::InvalidArguments(format!(
            "missing '{key}' argument"
        ))),
        Some(other @ (serde_json::Value::Number(_) | serde_json::Value::Bool(_))) => {
            Ok(other.to_string())
        }
        Some(_) => Err(ToolError::InvalidArguments(format!(
            "'{key}' must be a scalar value"
        ))),
    }
}

/// Like [`string_arg`], but falls back to the bare-scalar `input` key.
///
/// Only meaningful for tools with exactly one parameter.
pub fn sole_string_arg(arguments: &Arguments, key: &str) -> std::result::Result<String, ToolError> {
    if arguments.contains_key(key) {
        string_arg(arguments, key)
    } else if arguments.contains_key(INPUT_KEY) {
        string_arg(arguments, INPUT_KEY)
    } else {
        Err(ToolError::InvalidArguments(format!("missing '{key}' argument")))
    }
}

/// Read a numeric argument. Numeric-looking strings are accepted.
pub fn number_arg(arguments: &Arguments, key: &str) -> std::result::Result<f64, ToolError> {
    match arguments.get(key) {
        Some(serde_json::Value::Number(n)) => n
            .as_f64()
            .ok_or_else(|| ToolError::InvalidArguments(format!("'{key}' is out of range"))),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
            ToolError::InvalidArguments(format!("'{key}' must be a number, got '{s}'"))
        }),
        Some(_) => Err(ToolError::InvalidArguments(format!(
            "'{key}' must be a number"
        ))),
        None => Err(ToolError::InvalidArguments(format!(
            "missing '{key}' argument"
        ))),
    }
}

/// An immutable registry of available tools.
///
/// Built once at startup with [`ToolRegistry::register_all`], then shared
/// (typically behind an `Arc`) by every agent run. Iteration order is by
/// name, so the catalog is identical for identical tool sets.
pub struct ToolRegistry {
    tools: BTreeMap<String, Box<dyn Tool>>,
    timeout: Option<Duration>,
}

impl ToolRegistry {
    /// Build a registry from a tool set. Fails if two tools share a name.
    pub fn register_all(
        tools: impl IntoIterator<Item = Box<dyn Tool>>,
    ) -> std::result::Result<Self, RegistryError> {
        let mut map: BTreeMap<String, Box<dyn Tool>> = BTreeMap::new();
        for tool in tools {
            let name = tool.name().to_string();
            if map.contains_key(&name) {
                return Err(RegistryError::DuplicateName(name));
            }
            map.insert(name, tool);
        }
        debug!(count = map.len(), "Tool registry built");
        Ok(Self {
            tools: map,
            timeout: None,
        })
    }

    /// Bound every tool invocation by a wall-clock timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// List all registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Human-readable catalog, one signature per line.
    pub fn describe(&self) -> String {
        self.tools
            .values()
            .map(|t| t.signature())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Execute a tool by name, surfacing failures as [`ToolError`].
    pub async fn execute(
        &self,
        name: &str,
        arguments: &Arguments,
    ) -> std::result::Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, tool.execute(arguments))
                .await
                .map_err(|_| ToolError::Timeout {
                    tool_name: name.to_string(),
                    timeout_secs: limit.as_secs(),
                })?,
            None => tool.execute(arguments).await,
        }
    }

    /// Execute a tool and always return observation text.
    ///
    /// Unknown names produce a message listing every registered tool so the
    /// model can correct itself; tool failures become
    /// `error executing <name>: <cause>`.
    pub async fn dispatch(&self, name: &str, arguments: &Arguments) -> String {
        match self.execute(name, arguments).await {
            Ok(output) => output,
            Err(ToolError::NotFound(_)) => {
                warn!(tool = %name, "Model requested an unknown tool");
                format!(
                    "Tool '{}' does not exist. Available tools: [{}]",
                    name,
                    self.names().join(", ")
                )
            }
            Err(e) => {
                warn!(tool = %name, error = %e, "Tool execution failed");
                format!("error executing {name}: {e}")
            }
        }
    }
}
