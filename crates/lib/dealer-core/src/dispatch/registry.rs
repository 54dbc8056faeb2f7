use std::collections::HashSet;
use std::{error::Error, fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{ToolArguments, ToolError, whole_number};

pub type ToolHandler = Arc<dyn Fn(ToolArguments) -> Result<Value, ToolError> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    DuplicateTool(String),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateTool(name) => write!(f, "tool registered twice: {name}"),
        }
    }
}

impl Error for RegistryError {}

/// JSON type tag of a tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

impl PropertyType {
    #[must_use]
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => whole_number(value).is_some(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Object => "object",
            Self::Array => "array",
        }
    }
}

/// One parameter of a tool's input schema.
///
/// `enum` lists suggested values for callers; it is not enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolProperty {
    pub name: String,
    pub property_type: PropertyType,
    pub description: String,
    pub is_required: bool,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ToolProperty {
    pub fn new(
        name: impl Into<String>,
        property_type: PropertyType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            property_type,
            description: description.into(),
            is_required: false,
            enum_values: None,
            default: None,
        }
    }

    pub fn string(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, PropertyType::String, description)
    }

    pub fn integer(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, PropertyType::Integer, description)
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    #[must_use]
    pub fn with_enum<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = Some(values.into_iter().map(Into::into).collect());
        self
    }
}

/// Listing entry for a registered tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub input_schema: Vec<ToolProperty>,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: Vec::new(),
        }
    }

    #[must_use]
    pub fn param(mut self, property: ToolProperty) -> Self {
        self.input_schema.push(property);
        self
    }
}

/// A tool descriptor paired with its handler.
#[derive(Clone)]
pub struct RegisteredTool {
    descriptor: ToolDescriptor,
    handler: ToolHandler,
}

impl fmt::Debug for RegisteredTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredTool")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

impl RegisteredTool {
    #[must_use]
    pub const fn descriptor(&self) -> &ToolDescriptor {
        &self.descriptor
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    /// Checks `raw` against the input schema and fills declared defaults.
    ///
    /// Null values count as absent.
    ///
    /// # Errors
    /// Returns `ToolError::InvalidArguments` for undeclared parameters, missing
    /// required parameters, or values of the wrong JSON type.
    pub fn prepare_arguments(&self, raw: Map<String, Value>) -> Result<ToolArguments, ToolError> {
        let schema = &self.descriptor.input_schema;

        let declared: HashSet<&str> = schema.iter().map(|property| property.name.as_str()).collect();
        let mut undeclared: Vec<&str> = raw
            .keys()
            .map(String::as_str)
            .filter(|key| !declared.contains(key))
            .collect();
        if !undeclared.is_empty() {
            undeclared.sort_unstable();
            return Err(ToolError::InvalidArguments(format!(
                "unexpected argument(s): {}",
                undeclared.join(", ")
            )));
        }

        let mut values = Map::new();
        for property in schema {
            let supplied = raw.get(&property.name).filter(|value| !value.is_null());
            match supplied {
                Some(value) if !property.property_type.accepts(value) => {
                    return Err(ToolError::InvalidArguments(format!(
                        "argument '{}' must be of type {}",
                        property.name,
                        property.property_type.as_str()
                    )));
                }
                Some(value) => {
                    values.insert(property.name.clone(), value.clone());
                }
                None if property.is_required => {
                    return Err(ToolError::InvalidArguments(format!(
                        "missing required argument '{}'",
                        property.name
                    )));
                }
                None => {
                    if let Some(default) = &property.default {
                        values.insert(property.name.clone(), default.clone());
                    }
                }
            }
        }

        Ok(ToolArguments::new(values))
    }

    /// Runs the handler.
    ///
    /// # Errors
    /// Returns whatever error the handler reports.
    pub fn invoke(&self, arguments: ToolArguments) -> Result<Value, ToolError> {
        (self.handler)(arguments)
    }
}

/// Immutable set of tools, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistry {
    #[must_use]
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.tools.iter().map(RegisteredTool::descriptor)
    }

    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(RegisteredTool::name).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Collects tool registrations before freezing them into a `ToolRegistry`.
#[derive(Default)]
pub struct ToolRegistryBuilder {
    tools: Vec<RegisteredTool>,
}

impl ToolRegistryBuilder {
    #[must_use]
    pub fn tool<F>(mut self, descriptor: ToolDescriptor, handler: F) -> Self
    where
        F: Fn(ToolArguments) -> Result<Value, ToolError> + Send + Sync + 'static,
    {
        self.tools.push(RegisteredTool {
            descriptor,
            handler: Arc::new(handler),
        });
        self
    }

    /// Freezes the registrations.
    ///
    /// # Errors
    /// Returns `RegistryError::DuplicateTool` if two tools share a name.
    pub fn build(self) -> Result<ToolRegistry, RegistryError> {
        let mut seen = HashSet::new();
        for tool in &self.tools {
            if !seen.insert(tool.name()) {
                return Err(RegistryError::DuplicateTool(tool.name().to_string()));
            }
        }
        Ok(ToolRegistry { tools: self.tools })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn echo_registry() -> ToolRegistry {
        ToolRegistry::builder()
            .tool(
                ToolDescriptor::new("echo", "Echo the arguments back.")
                    .param(ToolProperty::string("text", "Text to echo.").required())
                    .param(ToolProperty::integer("times", "Repeat count.").with_default(1)),
                |arguments| Ok(Value::Object(arguments.into_inner())),
            )
            .build()
            .expect("registry should build")
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let result = ToolRegistry::builder()
            .tool(ToolDescriptor::new("dup", "first"), |_| Ok(Value::Null))
            .tool(ToolDescriptor::new("dup", "second"), |_| Ok(Value::Null))
            .build();
        assert_eq!(result.err(), Some(RegistryError::DuplicateTool("dup".to_string())));
    }

    #[test]
    fn defaults_are_filled() {
        let registry = echo_registry();
        let tool = registry.get("echo").expect("echo registered");
        let arguments = tool
            .prepare_arguments(object(json!({"text": "hi"})))
            .expect("arguments valid");
        assert_eq!(
            tool.invoke(arguments).expect("echo succeeds"),
            json!({"text": "hi", "times": 1})
        );
    }

    #[test]
    fn missing_required_argument_is_rejected() {
        let registry = echo_registry();
        let tool = registry.get("echo").expect("echo registered");
        let err = tool
            .prepare_arguments(object(json!({"text": null})))
            .expect_err("text is required");
        assert!(err.to_string().contains("'text'"));
    }

    #[test]
    fn wrong_type_and_unknown_arguments_are_rejected() {
        let registry = echo_registry();
        let tool = registry.get("echo").expect("echo registered");
        assert!(tool
            .prepare_arguments(object(json!({"text": "hi", "times": "2"})))
            .is_err());
        let err = tool
            .prepare_arguments(object(json!({"text": "hi", "loud": true})))
            .expect_err("loud is undeclared");
        assert!(err.to_string().contains("loud"));
    }

    #[test]
    fn whole_floats_count_as_integers() {
        assert!(PropertyType::Integer.accepts(&json!(30)));
        assert!(PropertyType::Integer.accepts(&json!(30.0)));
        assert!(!PropertyType::Integer.accepts(&json!(30.5)));
        assert!(!PropertyType::Integer.accepts(&json!(1e300)));
        assert!(!PropertyType::Integer.accepts(&json!("30")));

        let registry = echo_registry();
        let tool = registry.get("echo").expect("echo registered");
        let arguments = tool
            .prepare_arguments(object(json!({"text": "hi", "times": 2.0})))
            .expect("whole float accepted");
        assert_eq!(arguments.integer_or("times", 1).expect("times reads"), 2);
    }

    #[test]
    fn property_serializes_in_listing_shape() {
        let property = ToolProperty::integer("days", "Window length.").with_default(30);
        assert_eq!(
            serde_json::to_value(&property).expect("property serializes"),
            json!({
                "name": "days",
                "propertyType": "integer",
                "description": "Window length.",
                "isRequired": false,
                "default": 30
            })
        );
    }
}
