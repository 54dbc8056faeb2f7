//! Tool registry and call dispatch.
//!
//! Tools are registered explicitly at startup through `ToolRegistry::builder`.
//! The `Dispatcher` implements the two protocol operations: listing tools and
//! calling one by name with a JSON argument object. Every failure is resolved
//! into a `DispatchError` carrying a JSON-serializable body.

pub mod catalog;
pub mod dispatcher;
pub mod envelope;
pub mod registry;

use std::{error::Error, fmt};

use serde::Serialize;
use serde_json::{Map, Value, json};

pub use catalog::dealer_registry;
pub use dispatcher::{CallToolResponse, Dispatcher, TextContent, ToolListing};
pub use envelope::{EnvelopeReader, FieldPath};
pub use registry::{
    PropertyType,
    RegisteredTool,
    RegistryError,
    ToolDescriptor,
    ToolHandler,
    ToolProperty,
    ToolRegistry,
    ToolRegistryBuilder,
};

/// Failure raised by a tool handler.
#[derive(Debug)]
pub enum ToolError {
    InvalidArguments(String),
    Serialize(serde_json::Error),
    Failed(String),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArguments(message) => write!(f, "invalid arguments: {message}"),
            Self::Serialize(err) => write!(f, "failed to serialize tool result: {err}"),
            Self::Failed(message) => f.write_str(message),
        }
    }
}

impl Error for ToolError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::InvalidArguments(_) | Self::Failed(_) => None,
        }
    }
}

impl From<serde_json::Error> for ToolError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialize(err)
    }
}

/// Coarse failure class used by transports to pick a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchErrorKind {
    BadRequest,
    NotFound,
    Internal,
}

/// Failure of a call at the dispatch boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    MissingToolName,
    UnknownTool(String),
    InvalidArguments { tool: String, message: String },
    Handler { tool: String, message: String },
}

impl DispatchError {
    #[must_use]
    pub const fn kind(&self) -> DispatchErrorKind {
        match self {
            Self::MissingToolName | Self::InvalidArguments { .. } => DispatchErrorKind::BadRequest,
            Self::UnknownTool(_) => DispatchErrorKind::NotFound,
            Self::Handler { .. } => DispatchErrorKind::Internal,
        }
    }

    /// JSON body sent to the caller: `{"error": <message>}`.
    #[must_use]
    pub fn to_body(&self) -> Value {
        json!({ "error": self.to_string() })
    }
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToolName => f.write_str("Tool name is required"),
            Self::UnknownTool(name) => write!(f, "Tool '{name}' not found"),
            Self::InvalidArguments { tool, message } => {
                write!(f, "Invalid arguments for tool '{tool}': {message}")
            }
            Self::Handler { message, .. } => f.write_str(message),
        }
    }
}

impl Error for DispatchError {}

/// Validated argument object handed to a tool handler.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments(Map<String, Value>);

impl ToolArguments {
    #[must_use]
    pub const fn new(values: Map<String, Value>) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name).filter(|value| !value.is_null())
    }

    /// Returns a required string argument.
    ///
    /// # Errors
    /// Returns `ToolError::InvalidArguments` if the argument is absent or not a string.
    pub fn string(&self, name: &str) -> Result<&str, ToolError> {
        self.optional_string(name)?
            .ok_or_else(|| ToolError::InvalidArguments(format!("missing required argument '{name}'")))
    }

    /// Returns an optional string argument.
    ///
    /// # Errors
    /// Returns `ToolError::InvalidArguments` if the argument is present but not a string.
    pub fn optional_string(&self, name: &str) -> Result<Option<&str>, ToolError> {
        match self.get(name) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value.as_str())),
            Some(_) => Err(ToolError::InvalidArguments(format!(
                "argument '{name}' must be a string"
            ))),
        }
    }

    /// Returns an integer argument, or `default` when it is absent.
    ///
    /// # Errors
    /// Returns `ToolError::InvalidArguments` if the argument is present but not an integer.
    pub fn integer_or(&self, name: &str, default: i64) -> Result<i64, ToolError> {
        match self.get(name) {
            None => Ok(default),
            Some(value) => whole_number(value).ok_or_else(|| {
                ToolError::InvalidArguments(format!("argument '{name}' must be an integer"))
            }),
        }
    }

    #[must_use]
    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}

/// Reads an integer argument. Floats without a fractional part (`30.0`)
/// count as integers; anything outside the `i64` range does not.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn whole_number(value: &Value) -> Option<i64> {
    if let Some(number) = value.as_i64() {
        return Some(number);
    }
    let number = value.as_f64()?;
    (number.fract() == 0.0 && number >= i64::MIN as f64 && number < i64::MAX as f64)
        .then(|| number as i64)
}

/// Serializes a typed tool result into the JSON value returned to callers.
///
/// # Errors
/// Returns `ToolError::Serialize` if serialization fails.
pub fn to_tool_value<T: Serialize>(result: &T) -> Result<Value, ToolError> {
    Ok(serde_json::to_value(result)?)
}
