//! Extraction of the tool name and arguments from request envelopes.
//!
//! Callers speaking different protocol revisions put the argument object at
//! different places. Each place is a `FieldPath`; paths are tried in order
//! and the first match wins.

use serde_json::{Map, Value};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPath {
    Top(&'static str),
    Nested(&'static str, &'static str),
}

impl FieldPath {
    #[must_use]
    pub fn lookup(self, envelope: &Value) -> Option<&Value> {
        match self {
            Self::Top(field) => envelope.get(field),
            Self::Nested(parent, field) => envelope.get(parent)?.get(field),
        }
    }
}

impl std::fmt::Display for FieldPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Top(field) => f.write_str(field),
            Self::Nested(parent, field) => write!(f, "{parent}.{field}"),
        }
    }
}

pub const DEFAULT_NAME_PATHS: &[FieldPath] = &[
    FieldPath::Top("name"),
    FieldPath::Top("tool"),
    FieldPath::Nested("params", "name"),
];

pub const DEFAULT_ARGUMENT_PATHS: &[FieldPath] = &[
    FieldPath::Top("arguments"),
    FieldPath::Top("args"),
    FieldPath::Top("input"),
    FieldPath::Nested("params", "arguments"),
];

/// Ordered extraction strategies for tool names and argument objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeReader {
    name_paths: Vec<FieldPath>,
    argument_paths: Vec<FieldPath>,
}

impl Default for EnvelopeReader {
    fn default() -> Self {
        Self::new(DEFAULT_NAME_PATHS.to_vec(), DEFAULT_ARGUMENT_PATHS.to_vec())
    }
}

impl EnvelopeReader {
    #[must_use]
    pub const fn new(name_paths: Vec<FieldPath>, argument_paths: Vec<FieldPath>) -> Self {
        Self {
            name_paths,
            argument_paths,
        }
    }

    /// First string found along the name paths.
    #[must_use]
    pub fn tool_name<'a>(&self, envelope: &'a Value) -> Option<&'a str> {
        self.name_paths
            .iter()
            .find_map(|path| path.lookup(envelope).and_then(Value::as_str))
    }

    /// First JSON object found along the argument paths, else an empty object.
    #[must_use]
    pub fn arguments(&self, envelope: &Value) -> Map<String, Value> {
        for path in &self.argument_paths {
            if let Some(Value::Object(arguments)) = path.lookup(envelope) {
                debug!(%path, "extracted tool arguments");
                return arguments.clone();
            }
        }
        Map::new()
    }
}
