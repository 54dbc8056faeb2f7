use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use super::{DispatchError, EnvelopeReader, ToolDescriptor, ToolError, ToolRegistry};

/// Body of a list response: `{"tools": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolListing {
    pub tools: Vec<ToolDescriptor>,
}

/// Single text item of a call response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Body of a successful call: the tool result as JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallToolResponse {
    pub content: Vec<TextContent>,
}

impl CallToolResponse {
    /// Wraps `result` as a single text item holding its JSON serialization.
    ///
    /// # Errors
    /// Returns `serde_json::Error` if the value cannot be serialized.
    pub fn from_value(result: &Value) -> Result<Self, serde_json::Error> {
        Ok(Self {
            content: vec![TextContent {
                kind: "text".to_string(),
                text: serde_json::to_string(result)?,
            }],
        })
    }

    /// Parses the JSON payload of the first text item back into a value.
    #[must_use]
    pub fn payload(&self) -> Option<Value> {
        self.content
            .first()
            .and_then(|item| serde_json::from_str(&item.text).ok())
    }
}

/// Resolves tool calls against a registry.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    envelope: EnvelopeReader,
}

impl Dispatcher {
    #[must_use]
    pub fn new(registry: ToolRegistry) -> Self {
        Self::with_registry(Arc::new(registry))
    }

    #[must_use]
    pub fn with_registry(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            envelope: EnvelopeReader::default(),
        }
    }

    #[must_use]
    pub fn with_envelope(mut self, envelope: EnvelopeReader) -> Self {
        self.envelope = envelope;
        self
    }

    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Lists every registered tool.
    #[must_use]
    pub fn list(&self) -> ToolListing {
        ToolListing {
            tools: self.registry.descriptors().cloned().collect(),
        }
    }

    /// Calls the tool named in `envelope` with the arguments found in it.
    ///
    /// # Errors
    /// Returns `DispatchError` when the name is missing or unknown, the
    /// arguments do not fit the tool's schema, or the handler fails.
    pub fn call(&self, envelope: &Value) -> Result<CallToolResponse, DispatchError> {
        let name = self
            .envelope
            .tool_name(envelope)
            .ok_or(DispatchError::MissingToolName)?;
        let arguments = self.envelope.arguments(envelope);
        self.call_tool(name, arguments)
    }

    /// Calls `name` with an already extracted argument object.
    ///
    /// # Errors
    /// See [`Dispatcher::call`].
    pub fn call_tool(
        &self,
        name: &str,
        arguments: Map<String, Value>,
    ) -> Result<CallToolResponse, DispatchError> {
        let Some(tool) = self.registry.get(name) else {
            warn!(tool = name, "call to unknown tool");
            return Err(DispatchError::UnknownTool(name.to_string()));
        };

        let arguments = tool
            .prepare_arguments(arguments)
            .map_err(|err| invalid_arguments(name, &err))?;

        info!(tool = name, "dispatching tool call");
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| tool.invoke(arguments)));
        let result = match outcome {
            Ok(Ok(result)) => result,
            Ok(Err(ToolError::InvalidArguments(message))) => {
                return Err(DispatchError::InvalidArguments {
                    tool: name.to_string(),
                    message,
                });
            }
            Ok(Err(err)) => {
                error!(tool = name, error = %err, "tool handler failed");
                return Err(DispatchError::Handler {
                    tool: name.to_string(),
                    message: err.to_string(),
                });
            }
            Err(payload) => {
                error!(
                    tool = name,
                    panic = panic_message(payload.as_ref()),
                    "tool handler panicked"
                );
                return Err(DispatchError::Handler {
                    tool: name.to_string(),
                    message: format!("Tool '{name}' failed unexpectedly"),
                });
            }
        };

        CallToolResponse::from_value(&result).map_err(|err| {
            error!(tool = name, error = %err, "failed to encode tool result");
            DispatchError::Handler {
                tool: name.to_string(),
                message: err.to_string(),
            }
        })
    }
}

fn invalid_arguments(tool: &str, err: &ToolError) -> DispatchError {
    let message = match err {
        ToolError::InvalidArguments(message) => message.clone(),
        other => other.to_string(),
    };
    DispatchError::InvalidArguments {
        tool: tool.to_string(),
        message,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::{DispatchErrorKind, FieldPath, ToolProperty};
    use serde_json::json;

    fn dispatcher() -> Dispatcher {
        let registry = ToolRegistry::builder()
            .tool(
                ToolDescriptor::new("lookup", "Looks a thing up.")
                    .param(ToolProperty::string("id", "Thing id.").required()),
                |arguments| {
                    let id = arguments.string("id")?;
                    if id == "missing" {
                        Ok(json!({"error": "Thing not found"}))
                    } else {
                        Ok(json!({"id": id, "label": "ソウルレッド"}))
                    }
                },
            )
            .tool(ToolDescriptor::new("explode", "Always fails."), |_| {
                Err(ToolError::Failed("backend unavailable".to_string()))
            })
            .tool(ToolDescriptor::new("panic", "Always panics."), |_| {
                panic!("boom")
            })
            .build()
            .expect("registry should build");
        Dispatcher::new(registry)
    }

    #[test]
    fn lists_in_registration_order() {
        let listing = dispatcher().list();
        let names: Vec<_> = listing.tools.iter().map(|tool| tool.name.as_str()).collect();
        assert_eq!(names, vec!["lookup", "explode", "panic"]);
        let encoded = serde_json::to_value(&listing).expect("listing serializes");
        assert_eq!(encoded["tools"][0]["inputSchema"][0]["isRequired"], json!(true));
    }

    #[test]
    fn success_is_wrapped_as_json_text() {
        let response = dispatcher()
            .call(&json!({"name": "lookup", "arguments": {"id": "T1"}}))
            .expect("call succeeds");
        assert_eq!(response.content.len(), 1);
        assert_eq!(response.content[0].kind, "text");
        assert!(response.content[0].text.contains("ソウルレッド"));
        assert_eq!(
            response.payload(),
            Some(json!({"id": "T1", "label": "ソウルレッド"}))
        );
    }

    #[test]
    fn unknown_tool_names_the_tool() {
        let err = dispatcher()
            .call(&json!({"name": "nope", "arguments": {}}))
            .expect_err("tool is unknown");
        assert_eq!(err, DispatchError::UnknownTool("nope".to_string()));
        assert_eq!(err.kind(), DispatchErrorKind::NotFound);
        assert_eq!(err.to_body(), json!({"error": "Tool 'nope' not found"}));
    }

    #[test]
    fn handler_level_not_found_is_a_successful_call() {
        let response = dispatcher()
            .call(&json!({"name": "lookup", "arguments": {"id": "missing"}}))
            .expect("handler miss is still a result");
        assert_eq!(response.payload(), Some(json!({"error": "Thing not found"})));
    }

    #[test]
    fn missing_name_is_a_bad_request() {
        let err = dispatcher()
            .call(&json!({"arguments": {"id": "T1"}}))
            .expect_err("no name given");
        assert_eq!(err, DispatchError::MissingToolName);
        assert_eq!(err.kind(), DispatchErrorKind::BadRequest);
    }

    #[test]
    fn invalid_arguments_are_a_bad_request() {
        let err = dispatcher()
            .call(&json!({"name": "lookup"}))
            .expect_err("id is required");
        assert_eq!(err.kind(), DispatchErrorKind::BadRequest);
        assert!(err.to_string().contains("'id'"));
    }

    #[test]
    fn handler_errors_are_contained() {
        let err = dispatcher()
            .call(&json!({"name": "explode"}))
            .expect_err("handler fails");
        assert_eq!(err.kind(), DispatchErrorKind::Internal);
        assert_eq!(err.to_body(), json!({"error": "backend unavailable"}));
    }

    #[test]
    fn handler_panics_are_contained() {
        let dispatcher = dispatcher();
        let err = dispatcher
            .call(&json!({"name": "panic"}))
            .expect_err("handler panics");
        assert_eq!(err.kind(), DispatchErrorKind::Internal);
        assert_eq!(err.to_string(), "Tool 'panic' failed unexpectedly");

        let response = dispatcher
            .call(&json!({"params": {"name": "lookup", "arguments": {"id": "T2"}}}))
            .expect("later calls are unaffected");
        assert_eq!(response.payload().expect("payload")["id"], json!("T2"));
    }

    #[test]
    fn custom_envelope_paths_replace_defaults() {
        let dispatcher = dispatcher().with_envelope(EnvelopeReader::new(
            vec![FieldPath::Top("tool")],
            vec![FieldPath::Nested("request", "payload")],
        ));

        let response = dispatcher
            .call(&json!({"tool": "lookup", "request": {"payload": {"id": "T3"}}}))
            .expect("custom paths resolve");
        assert_eq!(response.payload().expect("payload")["id"], json!("T3"));

        let err = dispatcher
            .call(&json!({"name": "lookup", "arguments": {"id": "T3"}}))
            .expect_err("default paths are not consulted");
        assert_eq!(err, DispatchError::MissingToolName);
    }
}
